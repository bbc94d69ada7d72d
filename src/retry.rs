//! Retry logic with linear backoff
//!
//! Upstream requests are retried a fixed number of times. After failed attempt
//! `n` (1-indexed) the caller sleeps `n * base_delay`; the final failure is
//! returned as-is without a trailing sleep.
//!
//! # Example
//!
//! ```no_run
//! use card_data_updater::config::RetryConfig;
//! use card_data_updater::retry::with_retry;
//! use card_data_updater::{Error, Result};
//!
//! # async fn example() -> Result<()> {
//! let retry = RetryConfig::default();
//! let body = with_retry(&retry, || async {
//!     // A 503 is retried; the third consecutive one is returned to the caller
//!     Err::<String, _>(Error::UpstreamStatus {
//!         url: "https://api.scryfall.com/bulk-data".into(),
//!         status: 503,
//!     })
//! })
//! .await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::Error;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (connection refused, timeouts, 5xx/4xx from the upstream)
/// return `true`. Failures that cannot change on a second attempt return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Any transport failure or non-success status is worth another attempt
            Error::Transport { .. } | Error::UpstreamStatus { .. } => true,
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::Interrupted
            ),
            Error::Config { .. }
            | Error::Decode { .. }
            | Error::DiscoveryDecode { .. }
            | Error::MissingDataset { .. }
            | Error::Persistence { .. }
            | Error::Serialization(_) => false,
        }
    }
}

/// Delay to wait after failed attempt `attempt` (1-indexed)
pub fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    base_delay.saturating_mul(attempt)
}

/// Execute an async operation with linear backoff retry logic
///
/// # Arguments
///
/// * `config` - Retry configuration (total attempts, delay unit)
/// * `operation` - Async closure that returns Result<T, E> where E implements IsRetryable
///
/// # Returns
///
/// Returns the successful result, the first non-retryable error, or the last
/// error once `config.max_attempts` attempts have been made.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = backoff_delay(config.base_delay, attempt);

                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis(),
                    "Attempt failed, retrying"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = attempt,
                        "Operation failed after all retry attempts exhausted"
                    );
                } else {
                    tracing::error!(error = %e, "Operation failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}
