use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use seqbucket::plan::{
    interval_name, plan_buckets, read_distribution, read_fasta_lengths, write_bucket_list,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "alignbucket",
    about = "Plan length buckets minimizing alignment cost over a sequence length distribution"
)]
struct Cli {
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

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !(1..=100).contains(&cli.delta) {
        bail!("--delta must be in (0, 100]");
    }
    if cli.start == 0 {
        bail!("--start must be > 0");
    }

    if let Some(t) = cli.threads {
        if t == 0 {
            bail!("threads must be > 0");
        }
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(t)
            .build_global();
    }

    let (distribution, ids_by_length) = match (&cli.distribution, &cli.fasta) {
        (Some(path), None) => (read_distribution(path, cli.start)?, None),
        (None, Some(path)) => {
            let fasta = read_fasta_lengths(path, cli.start)?;
            (fasta.distribution, Some(fasta.ids_by_length))
        }
        _ => bail!("choose exactly one input: --distribution or --fasta"),
    };

    if cli.verbose {
        eprintln!(
            "{} records over {} distinct lengths",
            distribution.total_records(),
            distribution.counts.len()
        );
    }

    let plan = plan_buckets(&distribution, cli.delta)?;

    println!("naive_cost\t{}", plan.naive_cost);
    println!("full_interval_cost\t{}", plan.full_cost);
    println!("min_cost\t{}", plan.cost);
    println!("bucket_count\t{}", plan.intervals.len());
    if cli.verbose {
        for &(lo, hi) in &plan.intervals {
            eprintln!("interval\t{}", interval_name(lo, hi));
        }
    }

    if let Some(ids_by_length) = &ids_by_length {
        let list_path = cli.output_dir.join("buckets.list");
        write_bucket_list(&list_path, &plan.intervals, ids_by_length)?;
        println!("bucket_list\t{}", list_path.display());
    }

    Ok(())
}
