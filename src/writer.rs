use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn bucket_path(outdir: &Path, name: &str, gzip: bool) -> PathBuf {
    if gzip {
        outdir.join(format!("{name}.fasta.gz"))
    } else {
        outdir.join(format!("{name}.fasta"))
    }
}

pub fn open_bucket(outdir: &Path, name: &str, gzip: bool) -> Result<Box<dyn Write>> {
    let path = bucket_path(outdir, name, gzip);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open bucket file {}", path.display()))?;
    let buffered = BufWriter::new(file);

    if gzip {
        Ok(Box::new(GzEncoder::new(buffered, Compression::default())))
    } else {
        Ok(Box::new(buffered))
    }
}
