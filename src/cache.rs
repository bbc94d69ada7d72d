//! On-disk cache of downloaded bulk datasets
//!
//! One file per upstream version, holding the decoded (uncompressed) JSON exactly
//! as it was downloaded. A cache entry is only ever an optimization: unreadable or
//! corrupt entries are treated as misses, and failing to write one never fails a
//! run.

use crate::error::{Error, Result};
use crate::types::{BulkDataDescriptor, RawCard};
use std::path::PathBuf;

/// Directory-backed dataset cache
#[derive(Clone, Debug)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Create a cache rooted at `dir` (created on first use)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the cache entry for a dataset version
    pub fn path_for(&self, descriptor: &BulkDataDescriptor) -> PathBuf {
        self.dir.join(cache_key(descriptor))
    }

    /// Load a cached dataset for this version
    ///
    /// Returns `None` when the entry is missing, unreadable, or not a valid card
    /// list.
    pub async fn lookup(&self, descriptor: &BulkDataDescriptor) -> Option<Vec<RawCard>> {
        let path = self.path_for(descriptor);
        tracing::debug!(path = %path.display(), "Checking for cached data");

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Cache entry not readable");
                return None;
            }
        };

        match serde_json::from_slice::<Vec<RawCard>>(&content) {
            Ok(cards) => Some(cards),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt cache entry");
                None
            }
        }
    }

    /// Write a decoded dataset for this version, returning the entry's path
    pub async fn store(&self, descriptor: &BulkDataDescriptor, json: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::persistence(&self.dir, e))?;

        let path = self.path_for(descriptor);
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| Error::persistence(&path, e))?;
        Ok(path)
    }
}

/// File name for a dataset version
///
/// The dataset type becomes a dash-separated prefix, and every character of the
/// version timestamp that is not ASCII alphanumeric or '-' is replaced with '-',
/// e.g. `oracle-cards-2024-05-01T09-02-41-514-00-00.json`.
pub fn cache_key(descriptor: &BulkDataDescriptor) -> String {
    format!(
        "{}-{}.json",
        sanitize(&descriptor.kind),
        sanitize(&descriptor.updated_at)
    )
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}
