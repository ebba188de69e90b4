use serde::{Deserialize, Serialize};

use crate::persistence::Codec;

/// Slot the user data has always been stored under.
pub const DEFAULT_STORAGE_KEY: &str = "arcadeatlas.v1.userdata";

/// When a changed state reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// On a background thread; `dispatch` never waits for storage.
    #[default]
    Background,
    /// Inline, before `dispatch` returns.
    Immediate,
}

/// Store settings. Deserializable so an application can embed it in its own
/// settings file; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_key: String,
    pub codec: Codec,
    pub write_mode: WriteMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            codec: Codec::default(),
            write_mode: WriteMode::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }
}
