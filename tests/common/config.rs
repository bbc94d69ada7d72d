//! Mock upstream and test configuration helpers

use super::fixtures::{DATASET_TYPE, discovery_body};
use card_data_updater::{Config, RetryConfig};
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Discovery path served by [`MockUpstream`]
pub const DISCOVERY_PATH: &str = "/bulk-data";

/// A wiremock server standing in for the bulk-data API
pub struct MockUpstream {
    pub server: MockServer,
}

impl MockUpstream {
    /// Start a server with no mocks mounted
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Discovery endpoint URL
    pub fn discovery_url(&self) -> String {
        format!("{}{DISCOVERY_PATH}", self.server.uri())
    }

    /// Download path for a dataset type
    pub fn dataset_path(kind: &str) -> String {
        format!("/files/{kind}.json")
    }

    /// Serve a discovery listing for `kinds`, expecting `calls` requests
    pub async fn mount_discovery(&self, kinds: &[&str], calls: u64) {
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(discovery_body(&self.server.uri(), kinds)),
            )
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Serve `body` as the payload of `kind`, expecting `calls` requests
    pub async fn mount_dataset(&self, kind: &str, body: Vec<u8>, calls: u64) {
        Mock::given(method("GET"))
            .and(path(Self::dataset_path(kind)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Serve the dataset cards as plain JSON
    pub async fn mount_cards(&self, kind: &str, cards: &[Value], calls: u64) {
        let body = serde_json::to_vec(cards).expect("serialize cards");
        self.mount_dataset(kind, body, calls).await;
    }

    /// Check every mock's expected call count
    pub async fn verify(&self) {
        self.server.verify().await;
    }
}

/// Config pointing at `upstream` with all output under `dir`
///
/// Retries are fast so failure tests stay quick.
pub fn test_config(upstream: &MockUpstream, dir: &TempDir) -> Config {
    Config {
        discovery_url: upstream.discovery_url(),
        dataset_type: DATASET_TYPE.to_string(),
        cache_dir: dir.path().join(".cache"),
        data_dir: dir.path().join("public").join("data"),
        reports_dir: dir.path().join("reports"),
        progress_interval: 2,
        retry: RetryConfig {
            max_attempts: 2,
            base_delay: Duration::from_millis(5),
        },
        ..Config::default()
    }
}
