use crate::mapping::BucketMap;
use crate::writer::open_bucket;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub outdir: PathBuf,
    pub gzip: bool,
    pub unmapped_bucket: Option<String>,
}

#[derive(Debug, Default)]
pub struct SplitStats {
    pub total_records: u64,
    pub written_records: u64,
    pub dropped_records: u64,
    pub records_per_bucket: BTreeMap<String, u64>,
}

struct ActiveBucket {
    name: String,
    writer: Box<dyn Write>,
}

pub fn split_file(
    source: &Path,
    map: &BucketMap,
    cfg: &SplitConfig,
    stats: &mut SplitStats,
) -> Result<()> {
    let file = File::open(source)
        .with_context(|| format!("failed to open source file {}", source.display()))?;
    let mut reader = BufReader::new(file);

    let mut active: Vec<ActiveBucket> = Vec::new();
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("failed to read {}", source.display()))?;
        if n == 0 {
            break;
        }

        let stripped = trim_line_end(&buf);
        if stripped.first() == Some(&b'>') {
            flush_active(&mut active)?;
            active = open_for_record(&stripped[1..], map, cfg, stats)?;
        }

        for bucket in &mut active {
            bucket
                .writer
                .write_all(&buf)
                .with_context(|| format!("failed to write to bucket {}", bucket.name))?;
        }
    }

    flush_active(&mut active)?;
    Ok(())
}

fn open_for_record(
    id: &[u8],
    map: &BucketMap,
    cfg: &SplitConfig,
    stats: &mut SplitStats,
) -> Result<Vec<ActiveBucket>> {
    stats.total_records += 1;

    let mapped = map.buckets_for(id);
    let names: &[String] = if mapped.is_empty() {
        match &cfg.unmapped_bucket {
            Some(catch_all) => std::slice::from_ref(catch_all),
            None => &[],
        }
    } else {
        mapped
    };

    if names.is_empty() {
        stats.dropped_records += 1;
        return Ok(Vec::new());
    }
    stats.written_records += 1;

    let mut active = Vec::with_capacity(names.len());
    for name in names {
        // duplicate mapping entries collapse to one handle per bucket
        if active.iter().any(|b: &ActiveBucket| b.name == *name) {
            continue;
        }
        let writer = open_bucket(&cfg.outdir, name, cfg.gzip)?;
        *stats.records_per_bucket.entry(name.clone()).or_insert(0) += 1;
        active.push(ActiveBucket {
            name: name.clone(),
            writer,
        });
    }

    Ok(active)
}

fn flush_active(active: &mut Vec<ActiveBucket>) -> Result<()> {
    for bucket in active.iter_mut() {
        bucket
            .writer
            .flush()
            .with_context(|| format!("failed to flush bucket {}", bucket.name))?;
    }
    active.clear();
    Ok(())
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && line[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &line[..end]
}
