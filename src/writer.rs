//! Persistence of production artifacts and diagnostic reports
//!
//! Every artifact is rewritten from scratch on each run. Files are written to a
//! temporary sibling first and renamed into place, so a failed run leaves the
//! previous artifact intact instead of a truncated one.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::report::{UnusableArtReport, render_markdown};
use crate::types::{CardDataFile, CardDataMetadata};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Production card file name
pub const CARDS_FILE: &str = "cards.json";
/// Sidecar metadata file name
pub const METADATA_FILE: &str = "metadata.json";
/// Narrative report file name
pub const REPORT_MARKDOWN_FILE: &str = "unusable-art-cards.md";
/// Machine-readable report file name
pub const REPORT_JSON_FILE: &str = "unusable-art-cards.json";

/// Paths and size of the written production artifacts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenCardData {
    /// Card file
    pub path: PathBuf,
    /// Sidecar metadata file
    pub metadata_path: PathBuf,
    /// Card file size in bytes
    pub file_size: u64,
}

/// Paths of the written reports
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenReports {
    /// Narrative report
    pub markdown: PathBuf,
    /// Machine-readable report
    pub json: PathBuf,
}

/// Writes run output below the data and reports directories
#[derive(Clone, Debug)]
pub struct OutputWriter {
    data_dir: PathBuf,
    reports_dir: PathBuf,
}

impl OutputWriter {
    /// Create a writer for explicit directories
    pub fn new(data_dir: impl Into<PathBuf>, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            reports_dir: reports_dir.into(),
        }
    }

    /// Create a writer for the configured directories
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.data_dir, &config.reports_dir)
    }

    /// Write the card file (compact) and its metadata sidecar (pretty)
    ///
    /// Both files are staged before either is renamed into place. The sidecar
    /// is committed first, so a failure at any point leaves `cards.json`
    /// untouched.
    pub async fn write_card_data(&self, data: &CardDataFile) -> Result<WrittenCardData> {
        ensure_dir(&self.data_dir).await?;

        let path = self.data_dir.join(CARDS_FILE);
        let payload = serde_json::to_vec(data)?;
        let file_size = payload.len() as u64;

        let metadata = CardDataMetadata {
            last_updated: data.last_updated,
            bulk_data_updated: data.bulk_data_updated.clone(),
            format_counts: data.format_counts.clone(),
            total_cards: data.total_cards,
            file_size,
        };
        let metadata_path = self.data_dir.join(METADATA_FILE);
        let metadata_payload = serde_json::to_vec_pretty(&metadata)?;

        let cards_tmp = stage(&path, &payload).await?;
        let metadata_tmp = match stage(&metadata_path, &metadata_payload).await {
            Ok(tmp) => tmp,
            Err(e) => {
                discard(&cards_tmp).await;
                return Err(e);
            }
        };

        if let Err(e) = commit(&metadata_tmp, &metadata_path).await {
            discard(&cards_tmp).await;
            return Err(e);
        }
        commit(&cards_tmp, &path).await?;

        tracing::debug!(
            path = %path.display(),
            file_size,
            "Card data and metadata written"
        );

        Ok(WrittenCardData {
            path,
            metadata_path,
            file_size,
        })
    }

    /// Write the narrative and machine-readable unusable-art reports
    pub async fn write_reports(
        &self,
        report: &UnusableArtReport,
        generated_at: DateTime<Utc>,
    ) -> Result<WrittenReports> {
        ensure_dir(&self.reports_dir).await?;

        let markdown = self.reports_dir.join(REPORT_MARKDOWN_FILE);
        write_atomic(&markdown, render_markdown(report, generated_at).as_bytes()).await?;

        let json = self.reports_dir.join(REPORT_JSON_FILE);
        let document = serde_json::to_vec_pretty(&report.to_document(generated_at))?;
        write_atomic(&json, &document).await?;

        Ok(WrittenReports { markdown, json })
    }
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::persistence(dir, e))
}

/// Write `contents` to `path` via a temporary sibling and a rename
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = stage(path, contents).await?;
    commit(&tmp, path).await
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    path.with_file_name(tmp_name)
}

/// Write `contents` next to `path`, returning the temporary file
async fn stage(path: &Path, contents: &[u8]) -> Result<PathBuf> {
    let tmp = tmp_path(path);
    if let Err(e) = tokio::fs::write(&tmp, contents).await {
        discard(&tmp).await;
        return Err(Error::persistence(path, e));
    }
    Ok(tmp)
}

/// Move a staged file over `path`; the staged file is removed on failure
async fn commit(tmp: &Path, path: &Path) -> Result<()> {
    if let Err(e) = tokio::fs::rename(tmp, path).await {
        discard(tmp).await;
        return Err(Error::persistence(path, e));
    }
    Ok(())
}

async fn discard(tmp: &Path) {
    tokio::fs::remove_file(tmp).await.ok();
}
