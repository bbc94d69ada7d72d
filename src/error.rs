//! Error types for card-data-updater
//!
//! Every stage of the pipeline reports failures through [`Error`]. Variants carry
//! the context needed to diagnose a failed run from the log alone (the URL that
//! was fetched, the path that could not be written, both decode attempts, etc.).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for card-data-updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for card-data-updater
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "retry.max_attempts")
        key: Option<String>,
    },

    /// The request never produced an HTTP response (DNS, connect, timeout, body read)
    #[error("network error fetching {url}: {source}")]
    Transport {
        /// URL that was being fetched
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    UpstreamStatus {
        /// URL that was being fetched
        url: String,
        /// HTTP status code returned by the server
        status: u16,
    },

    /// Downloaded payload was neither gzip-compressed JSON nor plain JSON
    #[error("unable to parse downloaded data (gzip: {gzip}; json: {json})")]
    Decode {
        /// Why the gzip path failed
        gzip: String,
        /// Why the plain JSON path failed
        json: String,
    },

    /// The discovery endpoint answered with something other than a bulk-data list
    #[error("unable to parse discovery response from {url}: {source}")]
    DiscoveryDecode {
        /// Discovery URL
        url: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The discovery endpoint did not list the requested bulk dataset
    #[error("bulk dataset '{dataset_type}' not found in discovery response")]
    MissingDataset {
        /// The `type` tag that was looked for (e.g., "oracle_cards")
        dataset_type: String,
    },

    /// Writing an artifact to disk failed
    #[error("failed to write {}: {source}", .path.display())]
    Persistence {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Machine-readable error code, used as a structured log field
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Transport { .. } => "transport_failure",
            Error::UpstreamStatus { .. } => "upstream_status_failure",
            Error::Decode { .. } => "decode_failure",
            Error::DiscoveryDecode { .. } => "discovery_decode_failure",
            Error::MissingDataset { .. } => "missing_dataset",
            Error::Persistence { .. } => "persistence_failure",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
        }
    }

    /// Create a configuration error for a specific key
    pub(crate) fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Persistence {
            path: path.into(),
            source,
        }
    }
}
