use anyhow::Result;
use clap::{ArgAction, Parser};
use seqbucket::mapping::BucketMap;
use seqbucket::split::{SplitConfig, SplitStats, split_file};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bucketize",
    about = "Split FASTA records into per-bucket files using a bucket list"
)]
struct Cli {
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

    let map = BucketMap::load(&cli.bucket_list)?;
    if cli.verbose {
        eprintln!(
            "loaded {} mapping entries over {} buckets",
            map.len(),
            map.distinct_buckets().len()
        );
    }

    let cfg = SplitConfig {
        outdir: cli.output_dir,
        gzip: cli.gz_output,
        unmapped_bucket: cli.unmapped_bucket,
    };

    let mut stats = SplitStats::default();
    for file in &cli.files {
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
