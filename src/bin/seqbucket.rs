use anyhow::{Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use seqbucket::mapping::BucketMap;
use seqbucket::plan::{
    interval_name, plan_buckets, read_distribution, read_fasta_lengths, write_bucket_list,
};
use seqbucket::split::{SplitConfig, SplitStats, split_file};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "seqbucket",
    about = "Plan length buckets and split FASTA records into per-bucket files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Plan(PlanArgs),
    Split(SplitArgs),
}

#[derive(Args, Debug)]
#[command(about = "Plan length buckets minimizing alignment cost over a length distribution")]
struct PlanArgs {
    #[arg(short = 'd', long = "distribution")]
    distribution: Option<PathBuf>,

    #[arg(short = 'f', long = "fasta")]
    fasta: Option<PathBuf>,

    #[arg(long = "delta", default_value_t = 90)]
    delta: u32,

    #[arg(short = 's', long = "start", default_value_t = 1)]
    start: u32,

    #[arg(short = 'o', long = "output_dir", default_value = ".")]
    output_dir: PathBuf,

    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    #[arg(long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Args, Debug)]
#[command(about = "Split FASTA records into per-bucket files using a bucket list")]
struct SplitArgs {
    #[arg(short = 'l', long = "bucket_list", default_value = "buckets.list")]
    bucket_list: PathBuf,

    #[arg(short = 'o', long = "output_dir", default_value = ".")]
    output_dir: PathBuf,

    #[arg(short = 'u', long = "unmapped_bucket")]
    unmapped_bucket: Option<String>,

    #[arg(short = 'g', long = "gz_output", action = ArgAction::SetTrue)]
    gz_output: bool,

    #[arg(long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Plan(args) => run_plan(args),
        Commands::Split(args) => run_split(args),
    }
}

fn run_plan(args: PlanArgs) -> Result<()> {
    if !(1..=100).contains(&args.delta) {
        bail!("--delta must be in (0, 100]");
    }
    if args.start == 0 {
        bail!("--start must be > 0");
    }

    if let Some(t) = args.threads {
        if t == 0 {
            bail!("threads must be > 0");
        }
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(t)
            .build_global();
    }

    let (distribution, ids_by_length) = match (&args.distribution, &args.fasta) {
        (Some(path), None) => (read_distribution(path, args.start)?, None),
        (None, Some(path)) => {
            let fasta = read_fasta_lengths(path, args.start)?;
            (fasta.distribution, Some(fasta.ids_by_length))
        }
        _ => bail!("choose exactly one input: --distribution or --fasta"),
    };

    if args.verbose {
        eprintln!(
            "{} records over {} distinct lengths",
            distribution.total_records(),
            distribution.counts.len()
        );
    }

    let plan = plan_buckets(&distribution, args.delta)?;

    println!("naive_cost\t{}", plan.naive_cost);
    println!("full_interval_cost\t{}", plan.full_cost);
    println!("min_cost\t{}", plan.cost);
    println!("bucket_count\t{}", plan.intervals.len());
    if args.verbose {
        for &(lo, hi) in &plan.intervals {
            eprintln!("interval\t{}", interval_name(lo, hi));
        }
    }

    if let Some(ids_by_length) = &ids_by_length {
        let list_path = args.output_dir.join("buckets.list");
        write_bucket_list(&list_path, &plan.intervals, ids_by_length)?;
        println!("bucket_list\t{}", list_path.display());
    }

    Ok(())
}

fn run_split(args: SplitArgs) -> Result<()> {
    let map = BucketMap::load(&args.bucket_list)?;
    if args.verbose {
        eprintln!(
            "loaded {} mapping entries over {} buckets",
            map.len(),
            map.distinct_buckets().len()
        );
    }

    let cfg = SplitConfig {
        outdir: args.output_dir,
        gzip: args.gz_output,
        unmapped_bucket: args.unmapped_bucket,
    };

    let mut stats = SplitStats::default();
    for file in &args.files {
        split_file(file, &map, &cfg, &mut stats)?;
    }

    println!("total_records\t{}", stats.total_records);
    println!("written_records\t{}", stats.written_records);
    println!("dropped_records\t{}", stats.dropped_records);
    for (name, count) in &stats.records_per_bucket {
        println!("bucket_records\t{}\t{}", name, count);
    }

    Ok(())
}
