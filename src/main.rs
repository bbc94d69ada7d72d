//! update-card-data: refresh the client's card file from Scryfall bulk data
//!
//! Usage: update-card-data [--config config.json] [--data-dir public/data] ...

use card_data_updater::{Config, Pipeline};
use clap::Parser;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "update-card-data")]
#[command(about = "Download Scryfall bulk data and write the filtered card file")]
#[command(version)]
struct Args {
    /// JSON config file; command line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bulk-data discovery endpoint
    #[arg(long)]
    discovery_url: Option<String>,

    /// Bulk dataset type to download
    #[arg(long)]
    dataset_type: Option<String>,

    /// Directory for cached downloads
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Directory for cards.json and metadata.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for the unusable-art reports
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Total attempts per upstream request
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    async fn into_config(self) -> card_data_updater::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).await?,
            None => Config::default(),
        };

        if let Some(url) = self.discovery_url {
            config.discovery_url = url;
        }
        if let Some(dataset_type) = self.dataset_type {
            config.dataset_type = dataset_type;
        }
        if let Some(dir) = self.cache_dir {
            config.cache_dir = dir;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = self.reports_dir {
            config.reports_dir = dir;
        }
        if let Some(attempts) = self.max_attempts {
            config.retry.max_attempts = attempts;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting card data update");

    let result = async {
        let config = args.into_config().await?;
        Pipeline::new(config)?.run().await
    }
    .await;

    match result {
        Ok(summary) => {
            tracing::info!(
                dataset = %summary.descriptor.name,
                from_cache = summary.from_cache,
                dataset_cards = summary.dataset_cards,
                kept_cards = summary.kept_cards,
                unusable_art_cards = summary.unusable_art_cards,
                "Card data update completed successfully"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let mut chain = Vec::new();
            let mut source = StdError::source(&e);
            while let Some(cause) = source {
                chain.push(cause.to_string());
                source = cause.source();
            }
            tracing::error!(
                code = e.code(),
                error = %e,
                causes = ?chain,
                "Error during update process"
            );
            ExitCode::FAILURE
        }
    }
}
