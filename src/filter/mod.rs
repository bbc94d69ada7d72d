//! Card eligibility and projection
//!
//! A card reaches the client only when it has usable art and is legal in at least
//! one tracked format. [`CardAccumulator`] applies that policy one card at a time
//! and owns the running per-format tallies.

use crate::observer::Observer;
use crate::types::{CardFace, Event, Format, FormatCounts, ImageUris, LEGAL, ProcessedCard, RawCard};

/// Whether the client can show art for this card
///
/// True if the card has a direct art crop, or if its FIRST face has one. Later
/// faces are never consulted: a card whose art lives only on its back face is
/// treated as having no usable art.
pub fn has_usable_art(card: &RawCard) -> bool {
    if card
        .image_uris
        .as_ref()
        .is_some_and(ImageUris::has_art_crop)
    {
        return true;
    }

    card.faces().first().is_some_and(CardFace::has_art_crop)
}

/// Whether the card is legal in `format`
///
/// Only the exact status "legal" counts. "restricted", "banned", "not_legal" and
/// a missing key are all not legal.
pub fn is_legal_in(card: &RawCard, format: Format) -> bool {
    card.legalities
        .get(format.legality_key())
        .is_some_and(|status| status == LEGAL)
}

/// Formats the card is legal in, in output order
pub fn legal_formats(card: &RawCard) -> Vec<Format> {
    Format::ALL
        .into_iter()
        .filter(|format| is_legal_in(card, *format))
        .collect()
}

/// Reduce an upstream card to what the client needs
///
/// Legalities are replaced by `formats`. Image maps keep only the art and
/// border crops; faces are copied only when the card lists any.
pub fn project(card: &RawCard, formats: Vec<Format>) -> ProcessedCard {
    let card_faces = card.has_faces().then(|| {
        card.faces()
            .iter()
            .map(|face| CardFace {
                name: face.name.clone(),
                image_uris: face.image_uris.as_ref().map(reduce_images),
            })
            .collect()
    });

    ProcessedCard {
        id: card.id.clone(),
        name: card.name.clone(),
        scryfall_uri: card.scryfall_uri.clone(),
        layout: card.layout.clone(),
        image_uris: card.image_uris.as_ref().map(reduce_images),
        card_faces,
        formats,
    }
}

fn reduce_images(images: &ImageUris) -> ImageUris {
    ImageUris {
        art_crop: images.art_crop.clone(),
        border_crop: images.border_crop.clone(),
    }
}

/// What happened to one card
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Projected into the output
    Kept,
    /// Dropped: no art crop on the card or its first face
    NoUsableArt,
    /// Dropped: not legal in any tracked format
    NotLegal,
}

/// Result of filtering a whole dataset
#[derive(Clone, Debug, Default)]
pub struct FilterOutcome {
    /// Cards kept for the client, in input order
    pub cards: Vec<ProcessedCard>,
    /// Kept cards per format
    pub format_counts: FormatCounts,
    /// Cards examined
    pub processed: usize,
    /// Cards dropped for lack of usable art
    pub skipped_no_art: usize,
    /// Cards with art but no legal format
    pub skipped_not_legal: usize,
}

/// Running state of the filter/transform step
#[derive(Debug, Default)]
pub struct CardAccumulator {
    outcome: FilterOutcome,
}

impl CardAccumulator {
    /// Start with an empty outcome
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the eligibility policy to one card
    pub fn accept(&mut self, card: &RawCard) -> Verdict {
        self.outcome.processed += 1;

        if !has_usable_art(card) {
            self.outcome.skipped_no_art += 1;
            return Verdict::NoUsableArt;
        }

        let formats = legal_formats(card);
        if formats.is_empty() {
            self.outcome.skipped_not_legal += 1;
            return Verdict::NotLegal;
        }

        for format in &formats {
            self.outcome.format_counts.increment(*format);
        }
        self.outcome.cards.push(project(card, formats));
        Verdict::Kept
    }

    /// Cards examined so far
    pub fn processed(&self) -> usize {
        self.outcome.processed
    }

    /// Hand back the accumulated outcome
    pub fn finish(self) -> FilterOutcome {
        self.outcome
    }
}

/// Run the filter/transform step over a full dataset
///
/// Emits [`Event::Progress`] every `progress_interval` cards and
/// [`Event::FilterComplete`] at the end.
pub fn filter_cards(
    cards: &[RawCard],
    observer: &dyn Observer,
    progress_interval: usize,
) -> FilterOutcome {
    let total = cards.len();
    let interval = progress_interval.max(1);
    let mut accumulator = CardAccumulator::new();

    for card in cards {
        accumulator.accept(card);

        let processed = accumulator.processed();
        if processed % interval == 0 {
            observer.on_event(&Event::Progress { processed, total });
        }
    }

    let outcome = accumulator.finish();
    tracing::debug!(
        processed = outcome.processed,
        kept = outcome.cards.len(),
        skipped_no_art = outcome.skipped_no_art,
        skipped_not_legal = outcome.skipped_not_legal,
        "Filter finished"
    );
    observer.on_event(&Event::FilterComplete {
        kept: outcome.cards.len(),
        format_counts: outcome.format_counts.clone(),
    });
    outcome
}
