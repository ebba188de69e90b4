use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::userdata::UserDataState;

/// Handle returned by [`UserDataStore::subscribe`](super::UserDataStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Arc<UserDataState>) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Subscribers {
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl Subscribers {
    pub(crate) fn add<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Arc<UserDataState>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Calls every listener in subscription order. The list is copied first so
    /// a listener may subscribe, unsubscribe or dispatch.
    pub(crate) fn notify(&self, state: &Arc<UserDataState>) {
        self.notify_while(state, || true);
    }

    /// Like [`notify`](Self::notify), but stops before the next listener once
    /// `current` reports that `state` has been superseded.
    pub(crate) fn notify_while(&self, state: &Arc<UserDataState>, current: impl Fn() -> bool) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            if !current() {
                return;
            }
            listener(state);
        }
    }
}
