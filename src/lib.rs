//! On-device user data for a game catalog browser.
//!
//! - [`catalog`]: game snapshots, the five collections, and mapping from the
//!   catalog API's JSON.
//! - [`userdata`]: the root state and its pure transition function.
//! - [`persistence`]: best-effort storage of the root state in one key-value slot.
//! - [`store`]: the store that owns the canonical state and wires it all together.

pub mod catalog;
pub mod persistence;
pub mod store;
pub mod userdata;

pub use catalog::mapping::{InvolvedCompany, MappingError};
pub use catalog::{normalize_cover_url, GameId, GameSnap, ListType, UnknownListType};
pub use persistence::{
    Codec, CodecError, FileStorage, InMemoryStorage, KeyValueStorage, PersistenceAdapter,
    PersistenceError, PersistenceWriter, StorageError, WriterStats,
};
pub use store::{StoreConfig, SubscriptionId, UserDataStore, WriteMode, DEFAULT_STORAGE_KEY};
pub use userdata::{
    achievement_title, reduce, Achievement, AchievementProgress, Action, Collection,
    Environment, FixedEnvironment, Lists, Review, ReviewDraft, SystemEnvironment,
    UserDataState, ValidationError, RATING_RANGE,
};
