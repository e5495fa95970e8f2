use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct BucketMap {
    entries: HashMap<Vec<u8>, Vec<String>>,
}

impl BucketMap {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read bucket list {}", path.display()))?;

        let mut entries: HashMap<Vec<u8>, Vec<String>> = HashMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end();
            let Some((id, bucket)) = line.split_once('\t') else {
                bail!(
                    "{}:{}: expected two tab-separated fields, got {:?}",
                    path.display(),
                    idx + 1,
                    line
                );
            };
            if bucket.contains('\t') {
                bail!(
                    "{}:{}: expected two tab-separated fields, got {:?}",
                    path.display(),
                    idx + 1,
                    line
                );
            }
            entries
                .entry(id.as_bytes().to_vec())
                .or_default()
                .push(bucket.to_string());
        }

        Ok(Self { entries })
    }

    pub fn buckets_for(&self, id: &[u8]) -> &[String] {
        self.entries.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn distinct_buckets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for buckets in self.entries.values() {
            for b in buckets {
                if !names.contains(&b.as_str()) {
                    names.push(b);
                }
            }
        }
        names.sort_unstable();
        names
    }
}
