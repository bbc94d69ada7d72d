//! Upstream access: bulk-data discovery and dataset download
//!
//! Every request goes through [`Fetcher::fetch_with_retry`], which treats transport
//! failures and non-success statuses alike and retries them with linear backoff.

use crate::config::{HttpConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::retry::with_retry;
use crate::types::{BulkDataDescriptor, BulkDataList, RawCard};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::Instrument;

/// A downloaded payload, decoded into cards
#[derive(Clone, Debug)]
pub struct DecodedDataset {
    /// Parsed cards
    pub cards: Vec<RawCard>,
    /// Uncompressed JSON the cards were parsed from
    pub json: Vec<u8>,
    /// Whether the payload arrived gzip-compressed
    pub gzip: bool,
    /// Size of the payload as received
    pub payload_bytes: u64,
}

/// HTTP client with retry for upstream endpoints
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl Fetcher {
    /// Build a fetcher with the configured timeout and User-Agent
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(http: &HttpConfig, retry: RetryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(http.timeout)
            .user_agent(http.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: Some("http".into()),
            })?;

        Ok(Self { client, retry })
    }

    /// GET `url`, retrying failures up to the configured number of attempts
    ///
    /// Any non-2xx status is a failure. Failed attempts are logged; the error of
    /// the final attempt is returned.
    pub async fn fetch_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        with_retry(&self.retry, || self.get(url))
            .instrument(tracing::info_span!("fetch", url = %url))
            .await
    }

    /// GET `url` and read the full body, retrying the request and the body read
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        with_retry(&self.retry, || async move {
            let response = self.get(url).await?;
            let body = response.bytes().await.map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;
            Ok(body.to_vec())
        })
        .instrument(tracing::info_span!("fetch", url = %url))
        .await
    }

    /// Find the bulk dataset of type `dataset_type` on the discovery endpoint
    ///
    /// # Errors
    /// [`Error::DiscoveryDecode`] if the response is not a bulk-data list,
    /// [`Error::MissingDataset`] if the list does not include that type.
    pub async fn fetch_descriptor(
        &self,
        discovery_url: &str,
        dataset_type: &str,
    ) -> Result<BulkDataDescriptor> {
        tracing::info!(url = %discovery_url, "Fetching bulk data information");

        let body = self.fetch_bytes(discovery_url).await?;
        let list: BulkDataList =
            serde_json::from_slice(&body).map_err(|source| Error::DiscoveryDecode {
                url: discovery_url.to_string(),
                source,
            })?;

        list.data
            .into_iter()
            .find(|d| d.kind == dataset_type)
            .ok_or_else(|| Error::MissingDataset {
                dataset_type: dataset_type.to_string(),
            })
    }

    /// Download and decode the dataset a descriptor points at
    pub async fn download_dataset(&self, descriptor: &BulkDataDescriptor) -> Result<DecodedDataset> {
        tracing::info!(url = %descriptor.download_uri, "Downloading bulk data");

        let body = self.fetch_bytes(&descriptor.download_uri).await?;
        tracing::info!(bytes = body.len(), "Downloaded payload");

        decode_dataset(&body)
    }

    /// Single GET attempt
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Decode a payload as gzip-compressed JSON, falling back to plain JSON
///
/// # Errors
/// [`Error::Decode`] carrying both failure reasons when neither path works.
pub fn decode_dataset(body: &[u8]) -> Result<DecodedDataset> {
    let gzip_error = match gunzip(body) {
        Ok(json) => match serde_json::from_slice::<Vec<RawCard>>(&json) {
            Ok(cards) => {
                return Ok(DecodedDataset {
                    cards,
                    json,
                    gzip: true,
                    payload_bytes: body.len() as u64,
                });
            }
            Err(e) => format!("decompressed payload is not a card list: {}", e),
        },
        Err(e) => e.to_string(),
    };

    tracing::debug!(error = %gzip_error, "Gzip decompression failed, trying as plain JSON");

    match serde_json::from_slice::<Vec<RawCard>>(body) {
        Ok(cards) => Ok(DecodedDataset {
            cards,
            json: body.to_vec(),
            gzip: false,
            payload_bytes: body.len() as u64,
        }),
        Err(e) => {
            tracing::error!(
                gzip_error = %gzip_error,
                json_error = %e,
                "Failed to parse as both gzip and plain JSON"
            );
            Err(Error::Decode {
                gzip: gzip_error,
                json: e.to_string(),
            })
        }
    }
}

fn gunzip(body: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(body);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
