//! Upstream payload fixtures
//!
//! Cards are built as raw JSON so the tests exercise the same decoding path as
//! real Scryfall data, including fields the pipeline ignores.

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::{Value, json};
use std::io::Write;

/// Timestamp the mock discovery endpoint reports for every dataset
pub const UPDATED_AT: &str = "2024-05-01T09:02:41.514+00:00";

/// Dataset type requested by the default test config
pub const DATASET_TYPE: &str = "oracle_cards";

const FORMATS: [&str; 6] = ["standard", "pauper", "pioneer", "modern", "legacy", "vintage"];

/// Builder for one raw Scryfall card object
#[derive(Clone, Debug)]
pub struct CardJson {
    value: Value,
}

impl CardJson {
    /// Card with a normal layout, no images and "not_legal" everywhere
    pub fn new(name: &str) -> Self {
        let id = name.to_lowercase().replace(' ', "-");
        let legalities: serde_json::Map<String, Value> = FORMATS
            .iter()
            .chain(["commander", "oathbreaker"].iter())
            .map(|f| (f.to_string(), json!("not_legal")))
            .collect();
        Self {
            value: json!({
                "object": "card",
                "id": id,
                "oracle_id": format!("oracle-{id}"),
                "name": name,
                "lang": "en",
                "layout": "normal",
                "scryfall_uri": format!("https://scryfall.com/card/{id}"),
                "mana_cost": "{U}",
                "legalities": legalities,
            }),
        }
    }

    /// Set the layout
    pub fn layout(mut self, layout: &str) -> Self {
        self.value["layout"] = json!(layout);
        self
    }

    /// Give the card top-level images including an art crop
    pub fn with_art(mut self) -> Self {
        let id = self.id();
        self.value["image_uris"] = json!({
            "small": format!("https://cards.example/{id}/small.jpg"),
            "art_crop": format!("https://cards.example/{id}/art.jpg"),
            "border_crop": format!("https://cards.example/{id}/border.jpg"),
        });
        self
    }

    /// Add a face, optionally with its own art crop
    pub fn face(mut self, name: &str, with_art: bool) -> Self {
        let mut face = json!({ "object": "card_face", "name": name, "mana_cost": "" });
        if with_art {
            let key = name.to_lowercase().replace(' ', "-");
            face["image_uris"] = json!({
                "art_crop": format!("https://cards.example/{key}/art.jpg"),
                "border_crop": format!("https://cards.example/{key}/border.jpg"),
            });
        }
        match self.value.get_mut("card_faces").and_then(Value::as_array_mut) {
            Some(faces) => faces.push(face),
            None => self.value["card_faces"] = json!([face]),
        }
        self
    }

    /// Mark the card legal in the given formats (lowercase keys)
    pub fn legal_in(mut self, formats: &[&str]) -> Self {
        for format in formats {
            self.value["legalities"][*format] = json!("legal");
        }
        self
    }

    /// Set an arbitrary legality status
    pub fn status(mut self, format: &str, status: &str) -> Self {
        self.value["legalities"][format] = json!(status);
        self
    }

    /// Finished JSON value
    pub fn build(self) -> Value {
        self.value
    }

    fn id(&self) -> String {
        self.value["id"].as_str().unwrap_or_default().to_string()
    }
}

/// A small dataset covering every filter branch
///
/// - Opt: art, legal in modern, pauper, legacy, vintage
/// - Fable of the Mirror-Breaker: art only on faces, legal in pioneer and modern
/// - Wear // Tear: faces, art only on the second face, legal in modern
/// - Black Lotus: art, restricted in vintage only
/// - Goblin Token: art, not legal anywhere
/// - Nameless Faceless: no art, legal in standard
pub fn sample_dataset() -> Vec<Value> {
    vec![
        CardJson::new("Opt")
            .with_art()
            .legal_in(&["modern", "pauper", "legacy", "vintage"])
            .build(),
        CardJson::new("Fable of the Mirror-Breaker")
            .layout("transform")
            .face("Fable of the Mirror-Breaker", true)
            .face("Reflection of Kiki-Jiki", true)
            .legal_in(&["pioneer", "modern"])
            .build(),
        CardJson::new("Wear Tear")
            .layout("split")
            .face("Wear", false)
            .face("Tear", true)
            .legal_in(&["modern"])
            .build(),
        CardJson::new("Black Lotus")
            .with_art()
            .status("vintage", "restricted")
            .build(),
        CardJson::new("Goblin Token").layout("token").with_art().build(),
        CardJson::new("Nameless Faceless")
            .legal_in(&["standard"])
            .build(),
    ]
}

/// Discovery response listing the given dataset types, each downloadable
/// below `base_uri/files/`
pub fn discovery_body(base_uri: &str, kinds: &[&str]) -> Value {
    let data: Vec<Value> = kinds
        .iter()
        .map(|kind| {
            json!({
                "object": "bulk_data",
                "id": format!("id-{kind}"),
                "type": kind,
                "name": format!("{kind} dataset"),
                "description": "test dataset",
                "updated_at": UPDATED_AT,
                "size": 4096,
                "content_type": "application/json",
                "content_encoding": "gzip",
                "download_uri": format!("{base_uri}/files/{kind}.json"),
            })
        })
        .collect();
    json!({ "object": "list", "has_more": false, "data": data })
}

/// Gzip-compress `data`
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("gzip write");
    encoder.finish().expect("gzip finish")
}
