use std::sync::Arc;

use super::{Codec, KeyValueStorage, PersistenceError, StorageError};
use crate::userdata::UserDataState;

/// Reads and writes the root state in one storage slot.
///
/// Loading never fails and saving never reports failure: the in-memory state
/// stays authoritative, and the next successful save catches the slot up.
/// `try_load`/`try_save` expose the underlying results for callers that care.
#[derive(Clone)]
pub struct PersistenceAdapter {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    codec: Codec,
}

impl PersistenceAdapter {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>, codec: Codec) -> Self {
        Self {
            storage,
            key: key.into(),
            codec,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// The persisted state, or the empty default if the slot is absent,
    /// blank, unreadable or undecodable.
    pub fn load(&self) -> UserDataState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                log::debug!("no persisted user data under {}, starting empty", self.key);
                UserDataState::default()
            }
            Err(err) => {
                log::warn!("ignoring persisted user data under {}: {}", self.key, err);
                UserDataState::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<Option<UserDataState>, PersistenceError> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(self.codec.decode(&raw)?))
    }

    /// Best-effort write. Returns whether the slot now holds `state`.
    pub fn save(&self, state: &UserDataState) -> bool {
        match self.try_save(state) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("could not persist user data under {}: {}", self.key, err);
                false
            }
        }
    }

    pub fn try_save(&self, state: &UserDataState) -> Result<(), PersistenceError> {
        let blob = self.codec.encode(state)?;
        self.storage.set_item(&self.key, &blob)?;
        Ok(())
    }

    /// Remove the slot. Returns true if it existed.
    pub fn clear(&self) -> Result<bool, StorageError> {
        self.storage.remove_item(&self.key)
    }
}
