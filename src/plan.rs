use anyhow::{Context, Result, bail};
use needletail::parse_fastx_file;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LengthDistribution {
    pub start: u32,
    pub counts: Vec<u64>,
}

impl LengthDistribution {
    pub fn new(start: u32) -> Self {
        Self {
            start,
            counts: Vec::new(),
        }
    }

    pub fn add(&mut self, length: u32, count: u64) {
        if length < self.start {
            return;
        }
        let idx = (length - self.start) as usize;
        if idx >= self.counts.len() {
            self.counts.resize(idx + 1, 0);
        }
        self.counts[idx] += count;
    }

    pub fn max_length(&self) -> Option<u32> {
        if self.counts.is_empty() {
            None
        } else {
            Some(self.start + (self.counts.len() - 1) as u32)
        }
    }

    pub fn total_records(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[derive(Debug)]
pub struct FastaLengths {
    pub distribution: LengthDistribution,
    pub ids_by_length: BTreeMap<u32, Vec<String>>,
}

pub fn read_distribution(path: &Path, start: u32) -> Result<LengthDistribution> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read distribution file {}", path.display()))?;

    let mut dist = LengthDistribution::new(start);
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(length), Some(count), None) = (fields.next(), fields.next(), fields.next())
        else {
            bail!(
                "{}:{}: expected `<length> <count>`, got {:?}",
                path.display(),
                idx + 1,
                line
            );
        };
        let length: u32 = length
            .parse()
            .with_context(|| format!("{}:{}: invalid length", path.display(), idx + 1))?;
        let count: u64 = count
            .parse()
            .with_context(|| format!("{}:{}: invalid count", path.display(), idx + 1))?;
        dist.add(length, count);
    }

    Ok(dist)
}

pub fn read_fasta_lengths(path: &Path, start: u32) -> Result<FastaLengths> {
    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;

    let mut distribution = LengthDistribution::new(start);
    let mut ids_by_length: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    while let Some(record) = reader.next() {
        let record = record.with_context(|| format!("failed to parse {}", path.display()))?;
        let length = record.seq().len() as u32;
        if length < start {
            continue;
        }
        distribution.add(length, 1);
        ids_by_length
            .entry(length)
            .or_default()
            .push(String::from_utf8_lossy(record.id()).into_owned());
    }

    Ok(FastaLengths {
        distribution,
        ids_by_length,
    })
}

#[derive(Debug)]
pub struct Plan {
    pub intervals: Vec<(u32, u32)>,
    pub cost: u128,
    pub full_cost: u128,
    pub naive_cost: u128,
}

struct PrefixSums {
    records: Vec<u128>,
    residues: Vec<u128>,
}

impl PrefixSums {
    fn new(dist: &LengthDistribution) -> Self {
        let len = dist.counts.len();
        let mut records = Vec::with_capacity(len);
        let mut residues = Vec::with_capacity(len);
        let mut rec_acc = 0_u128;
        let mut res_acc = 0_u128;
        for (i, &count) in dist.counts.iter().enumerate() {
            rec_acc += count as u128;
            res_acc += (dist.start as u128 + i as u128) * count as u128;
            records.push(rec_acc);
            residues.push(res_acc);
        }
        Self { records, residues }
    }
}

fn interval_cost(lower: usize, upper: usize, sums: &PrefixSums) -> u128 {
    let residues = sums.residues[upper]
        - if lower > 0 {
            sums.residues[lower - 1]
        } else {
            0
        };
    let span = sums.records[upper] + 1
        - if lower > 0 {
            sums.records[lower - 1]
        } else {
            0
        };
    residues * span
}

fn upper_index(i: usize, len: usize, start: u32, delta: u32) -> usize {
    let a = i as u64 + start as u64;
    let stretched = if delta == 100 {
        a
    } else {
        a * 100 / delta as u64
    };
    let max_len = (len - 1) as u64 + start as u64;
    (stretched.min(max_len) - start as u64) as usize
}

pub fn plan_buckets(dist: &LengthDistribution, delta: u32) -> Result<Plan> {
    if delta == 0 || delta > 100 {
        bail!("delta must be in (0, 100]");
    }
    let len = dist.counts.len();
    if len == 0 {
        bail!("no records at or above the minimum length");
    }

    let start = dist.start;
    let sums = PrefixSums::new(dist);
    let mut best = vec![0_u128; len];
    let mut pred: Vec<Option<usize>> = vec![None; len];
    let mut naive = 0_u128;

    for i in 0..len {
        let upper = upper_index(i, len, start, delta);
        let mut cost_i = interval_cost(0, upper, &sums);
        let mut pred_i = None;

        if i > 0 {
            let done = &best[..i];
            let candidate = (0..i)
                .into_par_iter()
                .map(|lower| (interval_cost(lower + 1, upper, &sums) + done[lower], lower))
                .min();
            if let Some((cost, lower)) = candidate {
                if cost < cost_i {
                    cost_i = cost;
                    pred_i = Some(lower);
                }
            }
        }

        best[i] = cost_i;
        pred[i] = pred_i;

        let a = i as u64 + start as u64;
        let naive_lower = if delta == 100 {
            a
        } else {
            (a * delta as u64).div_ceil(100).max(start as u64)
        };
        naive += interval_cost((naive_lower - start as u64) as usize, upper, &sums);
    }

    let mut intervals = Vec::new();
    let mut i = len - 1;
    loop {
        let hi = start + upper_index(i, len, start, delta) as u32;
        match pred[i] {
            Some(lower) => {
                intervals.push((start + lower as u32 + 1, hi));
                i = lower;
            }
            None => {
                intervals.push((start, hi));
                break;
            }
        }
    }
    intervals.reverse();

    Ok(Plan {
        intervals,
        cost: best[len - 1],
        full_cost: interval_cost(0, len - 1, &sums),
        naive_cost: naive,
    })
}

pub fn interval_name(lo: u32, hi: u32) -> String {
    format!("{lo}-{hi}")
}

pub fn write_bucket_list(
    path: &Path,
    intervals: &[(u32, u32)],
    ids_by_length: &BTreeMap<u32, Vec<String>>,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create bucket list {}", path.display()))?;
    let mut out = BufWriter::new(file);

    for &(lo, hi) in intervals {
        let name = interval_name(lo, hi);
        for ids in ids_by_length.range(lo..=hi).map(|(_, ids)| ids) {
            for id in ids {
                writeln!(out, "{id}\t{name}")
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
    }

    out.flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
