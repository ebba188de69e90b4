//! The user-data store: one canonical [`UserDataState`], one way to change it.
//!
//! Construct a [`UserDataStore`] once at startup and pass it by reference (or
//! in an `Arc`) to whatever needs to read or dispatch. Readers get an
//! `Arc<UserDataState>` snapshot that no later dispatch can alter.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use arcade_atlas::{Action, GameSnap, InMemoryStorage, ListType, StoreConfig, UserDataStore};
//!
//! let store = UserDataStore::open(Arc::new(InMemoryStorage::new()), StoreConfig::default());
//! let before = store.state();
//!
//! store.dispatch(Action::AddToList {
//!     list: ListType::Favorites,
//!     snap: GameSnap::new(42, "Hollow Knight"),
//! });
//!
//! assert!(store.state().in_list(ListType::Favorites, 42));
//! assert!(!before.in_list(ListType::Favorites, 42));
//! store.flush();
//! ```

mod config;
mod subscribers;

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use serde_json::Value;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::persistence::{KeyValueStorage, PersistenceAdapter, PersistenceWriter};
use crate::userdata::{reduce, Action, Environment, SystemEnvironment, UserDataState};

pub use config::{StoreConfig, WriteMode, DEFAULT_STORAGE_KEY};
pub use subscribers::SubscriptionId;

use subscribers::Subscribers;

enum Sink {
    Immediate(PersistenceAdapter),
    Background(PersistenceWriter),
}

impl Sink {
    fn persist(&self, state: &Arc<UserDataState>) {
        match self {
            Sink::Immediate(adapter) => {
                adapter.save(state);
            }
            Sink::Background(writer) => writer.submit(Arc::clone(state)),
        }
    }

    fn flush(&self) {
        if let Sink::Background(writer) = self {
            writer.flush();
        }
    }
}

pub struct UserDataStore {
    state: RwLock<Arc<UserDataState>>,
    /// Serializes dispatches; readers never take it.
    dispatching: Mutex<()>,
    revision: AtomicU64,
    /// Revision last handed to subscribers. Reentrant so listeners may dispatch.
    notifying: ReentrantMutex<Cell<u64>>,
    env: Arc<dyn Environment>,
    sink: Sink,
    subscribers: Subscribers,
    storage_key: String,
}

impl UserDataStore {
    /// Load the persisted state (or start empty) and persist it back.
    pub fn open(storage: Arc<dyn KeyValueStorage>, config: StoreConfig) -> Self {
        Self::open_with_environment(storage, config, Arc::new(SystemEnvironment))
    }

    /// Like [`open`](Self::open), with an explicit clock and id source.
    pub fn open_with_environment(
        storage: Arc<dyn KeyValueStorage>,
        config: StoreConfig,
        env: Arc<dyn Environment>,
    ) -> Self {
        let adapter = PersistenceAdapter::new(storage, config.storage_key.clone(), config.codec);
        let initial = Arc::new(adapter.load());

        let sink = match config.write_mode {
            WriteMode::Immediate => Sink::Immediate(adapter),
            WriteMode::Background => Sink::Background(PersistenceWriter::spawn(adapter)),
        };
        sink.persist(&initial);

        log::debug!(
            "opened user data store {} ({} catalog entries)",
            config.storage_key,
            initial.catalog().len()
        );

        Self {
            state: RwLock::new(initial),
            dispatching: Mutex::new(()),
            revision: AtomicU64::new(0),
            notifying: ReentrantMutex::new(Cell::new(0)),
            env,
            sink,
            subscribers: Subscribers::default(),
            storage_key: config.storage_key,
        }
    }

    /// Current state. Cheap; later dispatches do not affect the returned value.
    pub fn state(&self) -> Arc<UserDataState> {
        Arc::clone(&self.state.read())
    }

    /// Number of state-changing dispatches since the store opened.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn snapshot(&self) -> (Arc<UserDataState>, u64) {
        let state = self.state.read();
        (Arc::clone(&state), self.revision.load(Ordering::SeqCst))
    }

    /// Apply a transition. Returns whether the state changed.
    ///
    /// On change the new state is published, handed to persistence and then
    /// passed to every subscriber, in that order. Subscribers always receive
    /// the latest state: revisions reach them in increasing order, and one
    /// overtaken by a concurrent or nested dispatch is skipped.
    pub fn dispatch(&self, action: Action) -> bool {
        {
            let _guard = self.dispatching.lock();
            let current = self.state();
            let Some(next) = reduce(&current, &action, self.env.as_ref()) else {
                log::debug!("{} for game {} left state unchanged", action.kind(), action.game_id());
                return false;
            };
            let next = Arc::new(next);
            let revision = {
                let mut slot = self.state.write();
                *slot = Arc::clone(&next);
                self.revision.fetch_add(1, Ordering::SeqCst) + 1
            };
            log::debug!(
                "{} for game {} -> revision {}",
                action.kind(),
                action.game_id(),
                revision
            );
            self.sink.persist(&next);
        }

        self.announce();
        true
    }

    fn announce(&self) {
        let notified = self.notifying.lock();
        let (latest, revision) = self.snapshot();
        if revision <= notified.get() {
            return;
        }
        notified.set(revision);
        self.subscribers
            .notify_while(&latest, || notified.get() == revision);
    }

    /// Apply a JSON transition request. Unknown or malformed requests are
    /// no-ops.
    pub fn dispatch_value(&self, value: &Value) -> bool {
        match Action::from_value(value) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    /// Apply transitions in order. Returns how many changed the state.
    pub fn dispatch_all(&self, actions: impl IntoIterator<Item = Action>) -> usize {
        actions
            .into_iter()
            .filter(|action| self.dispatch(action.clone()))
            .count()
    }

    /// Call `listener` with the new state after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Arc<UserDataState>) + Send + Sync + 'static,
    {
        self.subscribers.add(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Wait for pending background writes. Dropping the store does the same.
    pub fn flush(&self) {
        self.sink.flush();
    }
}
