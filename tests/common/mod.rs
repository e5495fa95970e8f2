#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn write_fasta(path: &Path, records: &[(&str, &str)]) -> Result<()> {
    let mut out = String::new();
    for (id, seq) in records {
        out.push('>');
        out.push_str(id);
        out.push('\n');
        out.push_str(seq);
        out.push('\n');
    }
    write_raw(path, &out)
}

pub fn write_list(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    let mut out = String::new();
    for (id, bucket) in entries {
        out.push_str(id);
        out.push('\t');
        out.push_str(bucket);
        out.push('\n');
    }
    write_raw(path, &out)
}

pub fn write_raw(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

pub fn read_text(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

pub fn fasta_files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("output dir should be readable")
        .map(|e| e.expect("dir entry should be readable"))
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            (name.ends_with(".fasta") || name.ends_with(".fasta.gz")).then_some(name)
        })
        .collect();
    names.sort();
    names
}
