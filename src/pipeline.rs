//! Run orchestration
//!
//! A run is strictly sequential: resolve the dataset version, load the dataset
//! from the cache or the network, filter it, write the diagnostic reports, then
//! write the production artifacts. The first error aborts the run; only the
//! fetcher retries anything.

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::filter::filter_cards;
use crate::observer::{Observer, TracingObserver};
use crate::report::build_report;
use crate::types::{BulkDataDescriptor, CardDataFile, Event, FormatCounts, RawCard};
use crate::writer::{OutputWriter, WrittenCardData, WrittenReports};
use chrono::Utc;
use std::sync::Arc;

/// What a successful run produced
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Dataset version that was processed
    pub descriptor: BulkDataDescriptor,
    /// Whether the dataset came from the cache
    pub from_cache: bool,
    /// Cards in the upstream dataset
    pub dataset_cards: usize,
    /// Cards written to the card file
    pub kept_cards: usize,
    /// Written cards per format
    pub format_counts: FormatCounts,
    /// Legal cards excluded for lack of usable art
    pub unusable_art_cards: usize,
    /// Production artifacts
    pub card_data: WrittenCardData,
    /// Diagnostic reports
    pub reports: WrittenReports,
}

/// The ingestion pipeline
pub struct Pipeline {
    config: Config,
    fetcher: Fetcher,
    cache: CacheStore,
    writer: OutputWriter,
    observer: Arc<dyn Observer>,
}

impl Pipeline {
    /// Build a pipeline that reports through [`TracingObserver`]
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be
    /// created
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let fetcher = Fetcher::new(&config.http, config.retry.clone())?;
        let cache = CacheStore::new(&config.cache_dir);
        let writer = OutputWriter::from_config(&config);

        Ok(Self {
            config,
            fetcher,
            cache,
            writer,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Report events to a different observer
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Execute one full run
    pub async fn run(&self) -> Result<RunSummary> {
        let descriptor = self
            .fetcher
            .fetch_descriptor(&self.config.discovery_url, &self.config.dataset_type)
            .await?;
        self.emit(Event::DescriptorResolved {
            name: descriptor.name.clone(),
            updated_at: descriptor.updated_at.clone(),
            size_bytes: descriptor.size,
        });

        let (cards, from_cache) = self.load_dataset(&descriptor).await?;

        let outcome = filter_cards(&cards, self.observer.as_ref(), self.config.progress_interval);

        let report = build_report(&cards);
        self.emit(Event::UnusableArtFound {
            total: report.total(),
            by_format: report.format_counts(),
        });

        let generated_at = Utc::now();
        let reports = self.writer.write_reports(&report, generated_at).await?;
        self.emit(Event::ReportsWritten {
            markdown: reports.markdown.clone(),
            json: reports.json.clone(),
        });

        let format_counts = outcome.format_counts.clone();
        let kept_cards = outcome.cards.len();
        let data = CardDataFile {
            cards: outcome.cards,
            format_counts: outcome.format_counts,
            last_updated: generated_at,
            bulk_data_updated: descriptor.updated_at.clone(),
            total_cards: kept_cards,
        };
        let card_data = self.writer.write_card_data(&data).await?;
        self.emit(Event::CardDataWritten {
            path: card_data.path.clone(),
            metadata_path: card_data.metadata_path.clone(),
            total_cards: kept_cards,
            file_size: card_data.file_size,
        });

        Ok(RunSummary {
            descriptor,
            from_cache,
            dataset_cards: cards.len(),
            kept_cards,
            format_counts,
            unusable_art_cards: report.total(),
            card_data,
            reports,
        })
    }

    /// Cached dataset for this version, or a fresh download that is then cached
    async fn load_dataset(&self, descriptor: &BulkDataDescriptor) -> Result<(Vec<RawCard>, bool)> {
        let cache_path = self.cache.path_for(descriptor);

        if let Some(cards) = self.cache.lookup(descriptor).await {
            self.emit(Event::CacheHit {
                path: cache_path,
                cards: cards.len(),
            });
            return Ok((cards, true));
        }
        self.emit(Event::CacheMiss {
            path: cache_path.clone(),
        });

        let decoded = self.fetcher.download_dataset(descriptor).await?;
        self.emit(Event::Downloaded {
            bytes: decoded.payload_bytes,
        });
        self.emit(Event::Decoded {
            gzip: decoded.gzip,
            cards: decoded.cards.len(),
        });

        match self.cache.store(descriptor, &decoded.json).await {
            Ok(path) => self.emit(Event::CacheStored { path }),
            Err(e) => self.emit(Event::CacheStoreFailed {
                path: cache_path,
                error: e.to_string(),
            }),
        }

        Ok((decoded.cards, false))
    }

    fn emit(&self, event: Event) {
        self.observer.on_event(&event);
    }
}
