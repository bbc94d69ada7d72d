//! Core types for card-data-updater
//!
//! Upstream records ([`BulkDataDescriptor`], [`RawCard`]) deserialize straight from
//! Scryfall's JSON using its field names. Output records ([`ProcessedCard`],
//! [`CardDataFile`], [`CardDataMetadata`]) serialize to the layout the game client
//! reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Legality status that counts as "playable in this format"
pub const LEGAL: &str = "legal";

/// A competitive game format tracked by the client
///
/// Variant order is the canonical output order for format lists and counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Format {
    /// Standard
    Standard,
    /// Pauper
    Pauper,
    /// Pioneer
    Pioneer,
    /// Modern
    Modern,
    /// Legacy
    Legacy,
    /// Vintage
    Vintage,
}

impl Format {
    /// All formats, in output order
    pub const ALL: [Format; 6] = [
        Format::Standard,
        Format::Pauper,
        Format::Pioneer,
        Format::Modern,
        Format::Legacy,
        Format::Vintage,
    ];

    /// Key of this format in a card's `legalities` mapping
    pub fn legality_key(&self) -> &'static str {
        match self {
            Format::Standard => "standard",
            Format::Pauper => "pauper",
            Format::Pioneer => "pioneer",
            Format::Modern => "modern",
            Format::Legacy => "legacy",
            Format::Vintage => "vintage",
        }
    }

    /// Display name, as written to output files
    pub fn name(&self) -> &'static str {
        match self {
            Format::Standard => "Standard",
            Format::Pauper => "Pauper",
            Format::Pioneer => "Pioneer",
            Format::Modern => "Modern",
            Format::Legacy => "Legacy",
            Format::Vintage => "Vintage",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-format card tally
///
/// Always holds an entry for every [`Format`], so serialized counts list all six
/// formats in output order even when some are zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatCounts(BTreeMap<Format, u64>);

impl FormatCounts {
    /// Create a tally with every format at zero
    pub fn new() -> Self {
        Self(Format::ALL.into_iter().map(|f| (f, 0)).collect())
    }

    /// Add one card to a format
    pub fn increment(&mut self, format: Format) {
        *self.0.entry(format).or_insert(0) += 1;
    }

    /// Count for a single format
    pub fn get(&self, format: Format) -> u64 {
        self.0.get(&format).copied().unwrap_or(0)
    }

    /// Iterate `(format, count)` pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (Format, u64)> + '_ {
        self.0.iter().map(|(f, c)| (*f, *c))
    }
}

impl Default for FormatCounts {
    fn default() -> Self {
        Self::new()
    }
}

/// Discovery response from the bulk-data endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkDataList {
    /// Available bulk datasets
    pub data: Vec<BulkDataDescriptor>,
}

/// One downloadable, versioned snapshot of upstream card data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDataDescriptor {
    /// Dataset type tag (e.g., "oracle_cards")
    #[serde(rename = "type")]
    pub kind: String,

    /// Human-readable dataset name
    pub name: String,

    /// Upstream version timestamp, kept verbatim
    pub updated_at: String,

    /// Payload size in bytes
    #[serde(default)]
    pub size: u64,

    /// Where the payload can be downloaded
    pub download_uri: String,
}

/// The two image crops the game client can use
///
/// Upstream image maps carry more variants (small, normal, png, ...); those are
/// dropped at deserialization time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUris {
    /// Artwork-only crop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_crop: Option<String>,

    /// Full card with the border trimmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_crop: Option<String>,
}

impl ImageUris {
    /// Whether this image map carries an art crop
    pub fn has_art_crop(&self) -> bool {
        self.art_crop.is_some()
    }
}

/// One face of a multi-faced card
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    /// Face name
    #[serde(default)]
    pub name: String,

    /// Face images, if the face has its own
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

impl CardFace {
    /// Whether this face carries an art crop
    pub fn has_art_crop(&self) -> bool {
        self.image_uris.as_ref().is_some_and(ImageUris::has_art_crop)
    }
}

/// Upstream card record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCard {
    /// Scryfall card id
    pub id: String,

    /// Card name
    pub name: String,

    /// Canonical Scryfall page
    #[serde(default)]
    pub scryfall_uri: String,

    /// Layout tag (normal, transform, split, ...)
    #[serde(default)]
    pub layout: String,

    /// Single-face images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,

    /// Faces, for multi-faced layouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_faces: Option<Vec<CardFace>>,

    /// Format key -> legality status
    #[serde(default)]
    pub legalities: HashMap<String, String>,
}

impl RawCard {
    /// Faces, treating an absent list as empty
    pub fn faces(&self) -> &[CardFace] {
        self.card_faces.as_deref().unwrap_or(&[])
    }

    /// Whether the card lists at least one face
    pub fn has_faces(&self) -> bool {
        !self.faces().is_empty()
    }
}

/// Card record as consumed by the game client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedCard {
    /// Scryfall card id
    pub id: String,

    /// Card name
    pub name: String,

    /// Canonical Scryfall page
    pub scryfall_uri: String,

    /// Layout tag
    pub layout: String,

    /// Reduced single-face images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,

    /// Reduced faces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_faces: Option<Vec<CardFace>>,

    /// Formats this card is legal in, in output order
    pub formats: Vec<Format>,
}

/// Production artifact: every usable card plus summary counts
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDataFile {
    /// Usable, legal cards
    pub cards: Vec<ProcessedCard>,

    /// Cards per format
    pub format_counts: FormatCounts,

    /// When this file was generated
    #[serde(with = "millis_timestamp")]
    pub last_updated: DateTime<Utc>,

    /// Upstream version the cards were taken from
    pub bulk_data_updated: String,

    /// Number of entries in `cards`
    pub total_cards: usize,
}

/// Sidecar artifact: summary of the card file without its payload
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDataMetadata {
    /// When the card file was generated
    #[serde(with = "millis_timestamp")]
    pub last_updated: DateTime<Utc>,

    /// Upstream version the cards were taken from
    pub bulk_data_updated: String,

    /// Cards per format
    pub format_counts: FormatCounts,

    /// Number of cards in the card file
    pub total_cards: usize,

    /// Size of the card file in bytes
    pub file_size: u64,
}

/// Event emitted while a pipeline run progresses
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Discovery endpoint returned the requested dataset
    DescriptorResolved {
        /// Dataset name
        name: String,
        /// Upstream version timestamp
        updated_at: String,
        /// Payload size in bytes
        size_bytes: u64,
    },

    /// Dataset was loaded from the cache
    CacheHit {
        /// Cache file
        path: PathBuf,
        /// Number of cards loaded
        cards: usize,
    },

    /// No usable cache entry for this version
    CacheMiss {
        /// Cache file that was looked for
        path: PathBuf,
    },

    /// Payload downloaded
    Downloaded {
        /// Body size in bytes
        bytes: u64,
    },

    /// Payload decoded into cards
    Decoded {
        /// True if the payload was gzip-compressed
        gzip: bool,
        /// Number of cards decoded
        cards: usize,
    },

    /// Dataset written to the cache
    CacheStored {
        /// Cache file
        path: PathBuf,
    },

    /// Writing the cache failed; the run continues
    CacheStoreFailed {
        /// Cache file
        path: PathBuf,
        /// Error message
        error: String,
    },

    /// Periodic filter progress
    Progress {
        /// Cards processed so far
        processed: usize,
        /// Cards in the dataset
        total: usize,
    },

    /// Filtering finished
    FilterComplete {
        /// Cards kept for the client
        kept: usize,
        /// Kept cards per format
        format_counts: FormatCounts,
    },

    /// Legal cards without usable art were found
    UnusableArtFound {
        /// Distinct unusable-but-legal cards
        total: usize,
        /// Unusable cards per format
        by_format: FormatCounts,
    },

    /// Diagnostic reports written
    ReportsWritten {
        /// Narrative report
        markdown: PathBuf,
        /// Machine-readable report
        json: PathBuf,
    },

    /// Production artifacts written
    CardDataWritten {
        /// Card file
        path: PathBuf,
        /// Sidecar metadata file
        metadata_path: PathBuf,
        /// Cards written
        total_cards: usize,
        /// Card file size in bytes
        file_size: u64,
    },
}

// RFC 3339 timestamps with millisecond precision and a `Z` suffix
pub(crate) mod millis_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
