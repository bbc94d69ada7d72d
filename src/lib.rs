//! # card-data-updater
//!
//! Downloads Scryfall's bulk card data and turns it into the compact card file the
//! game client loads.
//!
//! A run resolves the current version of the configured bulk dataset, loads it from
//! the local cache (or downloads and caches it), keeps only cards with usable art
//! that are legal in at least one tracked [`Format`], and writes:
//!
//! - `cards.json` and `metadata.json` for the client
//! - `unusable-art-cards.md` and `unusable-art-cards.json`, listing legal cards that
//!   were dropped because they have no art crop
//!
//! ## Quick Start
//!
//! ```no_run
//! use card_data_updater::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(Config::default())?;
//!     let summary = pipeline.run().await?;
//!     println!("{} cards written", summary.kept_cards);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Dataset cache
pub mod cache;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Upstream discovery and download
pub mod fetcher;
/// Card eligibility and projection
pub mod filter;
/// Progress and diagnostics reporting
pub mod observer;
/// Run orchestration
pub mod pipeline;
/// Unusable-art diagnostics
pub mod report;
/// Retry logic with linear backoff
pub mod retry;
/// Core types and events
pub mod types;
/// Artifact persistence
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, HttpConfig, RetryConfig};
pub use error::{Error, Result};
pub use observer::{NoopObserver, Observer, TracingObserver};
pub use pipeline::{Pipeline, RunSummary};
pub use types::{
    BulkDataDescriptor, CardDataFile, CardDataMetadata, CardFace, Event, Format, FormatCounts,
    ImageUris, ProcessedCard, RawCard,
};
