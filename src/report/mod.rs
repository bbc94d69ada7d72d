//! Diagnostics for legal cards the client cannot show
//!
//! A card that is legal somewhere but fails [`has_usable_art`] silently disappears
//! from the production file. This module collects those cards so the gap can be
//! inspected. It never influences what the filter keeps.

mod markdown;

pub use markdown::render_markdown;

use crate::filter::{has_usable_art, legal_formats};
use crate::types::{Format, FormatCounts, RawCard};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A legal card without usable art
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnusableArtRecord {
    /// Card name
    pub name: String,
    /// Scryfall card id
    pub id: String,
    /// Layout tag
    pub layout: String,
    /// Formats the card is legal in
    pub formats: Vec<Format>,
    /// Whether the card has a direct image map
    pub has_image_uris: bool,
    /// Whether the card lists any faces
    pub has_card_faces: bool,
    /// Canonical Scryfall page
    pub scryfall_uri: String,
}

/// Per-format entry for a legal card without usable art
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormatDetail {
    /// Card name
    pub name: String,
    /// Scryfall card id
    pub id: String,
    /// Layout tag
    pub layout: String,
    /// Whether the card has a direct image map
    pub has_image_uris: bool,
    /// Whether the card lists any faces
    pub has_card_faces: bool,
    /// Faces (any position) carrying an art crop
    pub card_faces_with_images: usize,
    /// Canonical Scryfall page
    pub scryfall_uri: String,
}

/// Everything the reports are rendered from
#[derive(Clone, Debug, Default)]
pub struct UnusableArtReport {
    /// Unusable-but-legal cards, in input order
    pub cards: Vec<UnusableArtRecord>,
    /// Detail entries grouped by format, in input order within each format
    pub by_format: BTreeMap<Format, Vec<FormatDetail>>,
}

impl UnusableArtReport {
    /// Number of distinct unusable-but-legal cards
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// Entries for one format
    pub fn for_format(&self, format: Format) -> &[FormatDetail] {
        self.by_format.get(&format).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Unusable cards per format
    pub fn format_counts(&self) -> FormatCounts {
        let mut counts = FormatCounts::new();
        for (format, entries) in &self.by_format {
            for _ in entries {
                counts.increment(*format);
            }
        }
        counts
    }

    /// Layout frequencies, most common first
    ///
    /// Layouts with equal counts keep the order in which they first appeared.
    pub fn layout_breakdown(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for card in &self.cards {
            match counts.iter_mut().find(|(layout, _)| *layout == card.layout) {
                Some((_, count)) => *count += 1,
                None => counts.push((card.layout.clone(), 1)),
            }
        }
        // stable sort keeps first-occurrence order among ties
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Machine-readable form of this report
    pub fn to_document(&self, generated_at: DateTime<Utc>) -> ReportDocument<'_> {
        ReportDocument {
            generated_at,
            summary: ReportSummary {
                total_cards: self.total(),
                format_breakdown: self.format_counts(),
                layout_breakdown: LayoutBreakdown(self.layout_breakdown()),
            },
            cards_by_format: CardsByFormat(self),
            all_cards: &self.cards,
        }
    }
}

/// Collect every legal card that fails the usable-art check
pub fn build_report(cards: &[RawCard]) -> UnusableArtReport {
    let mut report = UnusableArtReport {
        cards: Vec::new(),
        by_format: Format::ALL.into_iter().map(|f| (f, Vec::new())).collect(),
    };

    for card in cards.iter().filter(|c| !has_usable_art(c)) {
        let formats = legal_formats(card);
        if formats.is_empty() {
            continue;
        }

        let has_image_uris = card.image_uris.is_some();
        let has_card_faces = card.has_faces();
        let card_faces_with_images = card.faces().iter().filter(|f| f.has_art_crop()).count();

        for format in &formats {
            report.by_format.entry(*format).or_default().push(FormatDetail {
                name: card.name.clone(),
                id: card.id.clone(),
                layout: card.layout.clone(),
                has_image_uris,
                has_card_faces,
                card_faces_with_images,
                scryfall_uri: card.scryfall_uri.clone(),
            });
        }

        report.cards.push(UnusableArtRecord {
            name: card.name.clone(),
            id: card.id.clone(),
            layout: card.layout.clone(),
            formats,
            has_image_uris,
            has_card_faces,
            scryfall_uri: card.scryfall_uri.clone(),
        });
    }

    tracing::debug!(total = report.total(), "Unusable art analysis finished");
    report
}

/// JSON report layout
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument<'a> {
    #[serde(serialize_with = "crate::types::millis_timestamp::serialize")]
    generated_at: DateTime<Utc>,
    summary: ReportSummary,
    cards_by_format: CardsByFormat<'a>,
    all_cards: &'a [UnusableArtRecord],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportSummary {
    total_cards: usize,
    format_breakdown: FormatCounts,
    layout_breakdown: LayoutBreakdown,
}

/// Serializes as an object whose keys keep frequency order
#[derive(Debug)]
struct LayoutBreakdown(Vec<(String, usize)>);

impl Serialize for LayoutBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (layout, count) in &self.0 {
            map.serialize_entry(layout, count)?;
        }
        map.end()
    }
}

/// Serializes every format, including empty ones, in output order
#[derive(Debug)]
struct CardsByFormat<'a>(&'a UnusableArtReport);

impl Serialize for CardsByFormat<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Format::ALL.len()))?;
        for format in Format::ALL {
            map.serialize_entry(&format, self.0.for_format(format))?;
        }
        map.end()
    }
}
