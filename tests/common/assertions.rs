//! Assertions over written artifacts and collected events

use card_data_updater::{Event, Observer};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Read and parse a JSON artifact
pub async fn read_json(path: &Path) -> Value {
    let raw = tokio::fs::read(path)
        .await
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_slice(&raw)
        .unwrap_or_else(|e| panic!("{} is not valid JSON: {e}", path.display()))
}

/// Assert that none of the run's artifacts exist below `root`
pub fn assert_no_artifacts(root: &Path) {
    for artifact in [
        "public/data/cards.json",
        "public/data/metadata.json",
        "reports/unusable-art-cards.md",
        "reports/unusable-art-cards.json",
    ] {
        assert!(
            !root.join(artifact).exists(),
            "{artifact} should not have been written"
        );
    }
}

/// Observer that records every event in order
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// Names of the recorded event variants, in order
    pub fn kinds(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(|e| {
                serde_json::to_value(e).expect("serialize event")["type"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    /// Observer handle for a pipeline
    pub fn observer(&self) -> Arc<dyn Observer> {
        Arc::new(self.clone())
    }
}

impl Observer for EventLog {
    fn on_event(&self, event: &Event) {
        self.events.lock().expect("event log poisoned").push(event.clone());
    }
}
