//! Configuration types for card-data-updater

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Scryfall bulk-data discovery endpoint
pub const DEFAULT_DISCOVERY_URL: &str = "https://api.scryfall.com/bulk-data";

/// Bulk dataset holding one record per Oracle card
pub const DEFAULT_DATASET_TYPE: &str = "oracle_cards";

/// Main configuration for a pipeline run
///
/// Every field has a default, so an empty JSON object (or no config file at all)
/// reproduces the standard layout: cache in `.cache`, card data in `public/data`,
/// reports in `reports`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Bulk-data discovery endpoint (default: Scryfall's `/bulk-data`)
    #[serde(default = "default_discovery_url")]
    pub discovery_url: String,

    /// `type` tag of the bulk dataset to download (default: "oracle_cards")
    #[serde(default = "default_dataset_type")]
    pub dataset_type: String,

    /// Directory holding one cached dataset per upstream version (default: ".cache")
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory receiving `cards.json` and `metadata.json` (default: "public/data")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory receiving the unusable-art reports (default: "reports")
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Emit a progress event every this many processed cards (default: 5000)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry behavior for upstream requests
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discovery_url: default_discovery_url(),
            dataset_type: default_dataset_type(),
            cache_dir: default_cache_dir(),
            data_dir: default_data_dir(),
            reports_dir: default_reports_dir(),
            progress_interval: default_progress_interval(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults. The loaded configuration is
    /// validated before it is returned.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| Error::Config {
            message: format!("failed to read config file {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("invalid config file {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.discovery_url.trim().is_empty() {
            return Err(Error::config("must not be empty", "discovery_url"));
        }
        if self.dataset_type.trim().is_empty() {
            return Err(Error::config("must not be empty", "dataset_type"));
        }
        if self.progress_interval == 0 {
            return Err(Error::config(
                "must be greater than zero",
                "progress_interval",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::config(
                "must be at least 1",
                "retry.max_attempts",
            ));
        }
        Ok(())
    }
}

/// HTTP client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds (default: 300; bulk files are large)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Retry configuration for upstream requests
///
/// Backoff is linear: after failed attempt `n` (1-indexed) the fetcher waits
/// `n * base_delay` before trying again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay unit for the linear backoff, in milliseconds (default: 1000)
    #[serde(default = "default_base_delay", with = "millis_serde")]
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
        }
    }
}

fn default_discovery_url() -> String {
    DEFAULT_DISCOVERY_URL.to_string()
}

fn default_dataset_type() -> String {
    DEFAULT_DATASET_TYPE.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("public/data")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_progress_interval() -> usize {
    5000
}

fn default_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_user_agent() -> String {
    format!("card-data-updater/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay() -> Duration {
    Duration::from_millis(1000)
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert_eq!(config.discovery_url, DEFAULT_DISCOVERY_URL);
        assert_eq!(config.dataset_type, "oracle_cards");
        assert_eq!(config.cache_dir, PathBuf::from(".cache"));
        assert_eq!(config.data_dir, PathBuf::from("public/data"));
        assert_eq!(config.reports_dir, PathBuf::from("reports"));
        assert_eq!(config.progress_interval, 5000);
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.http.timeout, Duration::from_secs(300));
    }

    #[test]
    fn retry_defaults_are_three_attempts_one_second_apart() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn nested_sections_accept_partial_overrides() {
        let json = r#"{
            "data_dir": "out",
            "retry": { "max_attempts": 5 },
            "http": { "timeout": 30 }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("out"));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay, Duration::from_millis(1000));
        assert_eq!(config.http.timeout, Duration::from_secs(30));
        assert!(config.http.user_agent.starts_with("card-data-updater/"));
    }

    #[test]
    fn base_delay_serializes_as_millis() {
        let retry = RetryConfig {
            max_attempts: 2,
            base_delay: Duration::from_millis(250),
        };
        let json = serde_json::to_value(&retry).unwrap();
        assert_eq!(json["base_delay"], 250);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;

        match config.validate().unwrap_err() {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("retry.max_attempts")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn zero_progress_interval_is_rejected() {
        let config = Config {
            progress_interval: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn blank_dataset_type_is_rejected() {
        let config = Config {
            dataset_type: "  ".into(),
            ..Default::default()
        };
        match config.validate().unwrap_err() {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("dataset_type")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{ "reports_dir": "diag", "progress_interval": 100 }"#)
            .await
            .unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.reports_dir, PathBuf::from("diag"));
        assert_eq!(config.progress_interval, 100);
    }

    #[tokio::test]
    async fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(matches!(
            Config::load(&path).await,
            Err(Error::Config { key: None, .. })
        ));
    }

    #[tokio::test]
    async fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
