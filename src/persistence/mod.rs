//! Persistence - the only part of the crate that touches durable storage.
//!
//! The root state lives in a single slot of a [`KeyValueStorage`]. It is read
//! once when a store opens and rewritten after every change. Both directions
//! are best-effort: a missing or corrupt slot means "start empty", and a failed
//! write is logged and forgotten.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use arcade_atlas::{Codec, InMemoryStorage, PersistenceAdapter, UserDataState};
//!
//! let storage = InMemoryStorage::new();
//! let adapter = PersistenceAdapter::new(Arc::new(storage), "arcadeatlas.v1.userdata", Codec::Json);
//! assert!(adapter.save(&UserDataState::default()));
//! assert_eq!(adapter.load(), UserDataState::default());
//! ```

mod adapter;
mod codec;
mod error;
mod file;
mod in_memory;
mod writer;

use std::sync::Arc;

pub use adapter::PersistenceAdapter;
pub use codec::Codec;
pub use error::{CodecError, PersistenceError, StorageError};
pub use file::FileStorage;
pub use in_memory::InMemoryStorage;
pub use writer::{PersistenceWriter, WriterStats};

/// A durable string-keyed, string-valued slot store (browser `localStorage`,
/// a directory of files, a settings database table, ...).
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Returns true if the key existed.
    fn remove_item(&self, key: &str) -> Result<bool, StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove_item(key)
    }
}
