//! Progress and diagnostics reporting
//!
//! The pipeline never logs run milestones directly. It hands each [`Event`] to a
//! single [`Observer`], and the observer decides where the event goes: the
//! tracing log, a broadcast channel, or an ad-hoc closure.

use crate::types::Event;
use tokio::sync::broadcast;

/// Receives every event a pipeline run emits
pub trait Observer: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &Event);
}

/// Closures can observe a run directly
impl<F> Observer for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn on_event(&self, event: &Event) {
        self(event)
    }
}

/// Fan events out to broadcast subscribers
///
/// Sending with no live receivers is not an error for the run.
impl Observer for broadcast::Sender<Event> {
    fn on_event(&self, event: &Event) {
        self.send(event.clone()).ok();
    }
}

/// Observer that discards all events
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_event(&self, _event: &Event) {}
}

/// Observer that renders events as structured tracing records
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&self, event: &Event) {
        match event {
            Event::DescriptorResolved {
                name,
                updated_at,
                size_bytes,
            } => {
                tracing::info!(
                    name = %name,
                    updated_at = %updated_at,
                    size_mb = format!("{:.2}", *size_bytes as f64 / 1024.0 / 1024.0),
                    "Found bulk dataset"
                );
            }
            Event::CacheHit { path, cards } => {
                tracing::info!(path = %path.display(), cards, "Using cached data");
            }
            Event::CacheMiss { path } => {
                tracing::info!(path = %path.display(), "No cached data found, will download fresh data");
            }
            Event::Downloaded { bytes } => {
                tracing::info!(bytes, "Downloaded bulk data");
            }
            Event::Decoded { gzip, cards } => {
                if *gzip {
                    tracing::info!(cards, "Decompressed gzipped data");
                } else {
                    tracing::info!(cards, "Parsed payload as plain JSON");
                }
            }
            Event::CacheStored { path } => {
                tracing::info!(path = %path.display(), "Cached data saved");
            }
            Event::CacheStoreFailed { path, error } => {
                tracing::warn!(path = %path.display(), error = %error, "Failed to cache data");
            }
            Event::Progress { processed, total } => {
                tracing::info!(processed, total, "Processing cards");
            }
            Event::FilterComplete {
                kept,
                format_counts,
            } => {
                tracing::info!(kept, "Processing complete");
                for (format, count) in format_counts.iter() {
                    tracing::info!(format = %format, cards = count, "Format total");
                }
            }
            Event::UnusableArtFound { total, by_format } => {
                tracing::info!(total, "Legal cards excluded due to unusable art");
                for (format, count) in by_format.iter().filter(|(_, c)| *c > 0) {
                    tracing::info!(format = %format, cards = count, "Unusable cards in format");
                }
            }
            Event::ReportsWritten { markdown, json } => {
                tracing::info!(
                    markdown = %markdown.display(),
                    json = %json.display(),
                    "Unusable art report saved"
                );
            }
            Event::CardDataWritten {
                path,
                metadata_path,
                total_cards,
                file_size,
            } => {
                tracing::info!(
                    path = %path.display(),
                    metadata = %metadata_path.display(),
                    total_cards,
                    size_mb = format!("{:.2}", *file_size as f64 / 1024.0 / 1024.0),
                    "Card data saved"
                );
            }
        }
    }
}
