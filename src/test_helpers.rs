//! Shared test helpers for building upstream card records in tests.

use crate::types::{CardFace, Format, ImageUris, RawCard};

/// Fluent builder for [`RawCard`] fixtures.
///
/// Every format starts out "not_legal"; cards have no images or faces until
/// asked for.
pub(crate) struct CardBuilder {
    card: RawCard,
}

impl CardBuilder {
    pub(crate) fn new(name: &str) -> Self {
        let id = name.to_lowercase().replace(' ', "-");
        let legalities = Format::ALL
            .into_iter()
            .map(|f| (f.legality_key().to_string(), "not_legal".to_string()))
            .collect();

        Self {
            card: RawCard {
                scryfall_uri: format!("https://scryfall.com/card/{}", id),
                id,
                name: name.to_string(),
                layout: "normal".to_string(),
                image_uris: None,
                card_faces: None,
                legalities,
            },
        }
    }

    pub(crate) fn layout(mut self, layout: &str) -> Self {
        self.card.layout = layout.to_string();
        self
    }

    /// Direct image map with both crops
    pub(crate) fn with_art(mut self) -> Self {
        self.card.image_uris = Some(images(&self.card.id));
        self
    }

    /// Direct image map without an art crop
    pub(crate) fn with_border_only(mut self) -> Self {
        self.card.image_uris = Some(ImageUris {
            art_crop: None,
            border_crop: Some(format!("https://cards.example/{}/border.jpg", self.card.id)),
        });
        self
    }

    pub(crate) fn face(mut self, name: &str, with_art: bool) -> Self {
        let face = CardFace {
            name: name.to_string(),
            image_uris: with_art.then(|| images(name)),
        };
        self.card.card_faces.get_or_insert_with(Vec::new).push(face);
        self
    }

    pub(crate) fn empty_faces(mut self) -> Self {
        self.card.card_faces = Some(Vec::new());
        self
    }

    pub(crate) fn legal_in(self, formats: &[Format]) -> Self {
        formats
            .iter()
            .fold(self, |builder, f| builder.status(*f, "legal"))
    }

    pub(crate) fn status(mut self, format: Format, status: &str) -> Self {
        self.card
            .legalities
            .insert(format.legality_key().to_string(), status.to_string());
        self
    }

    pub(crate) fn without_legalities(mut self) -> Self {
        self.card.legalities.clear();
        self
    }

    pub(crate) fn build(self) -> RawCard {
        self.card
    }
}

fn images(key: &str) -> ImageUris {
    let key = key.to_lowercase().replace(' ', "-");
    ImageUris {
        art_crop: Some(format!("https://cards.example/{}/art.jpg", key)),
        border_crop: Some(format!("https://cards.example/{}/border.jpg", key)),
    }
}
