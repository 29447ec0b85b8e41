//! Store configuration.

use serde::{Deserialize, Serialize};

/// Settings applied when a store is built.
///
/// Deserializable so applications can keep it next to their own settings;
/// every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name attached to every log line emitted by the store
    pub name: String,

    /// Keep a history of the last N applied commands (`None` disables it)
    pub history_limit: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            history_limit: None,
        }
    }
}

impl StoreConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_history(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}
