//! Background persistence for the store.
//!
//! The dispatching thread hands each new state to a writer thread and moves on.
//! Writes coalesce: if several states are submitted while a write is in flight,
//! only the newest one is written next.

use parking_lot::{Condvar, Mutex};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::PersistenceAdapter;
use crate::userdata::UserDataState;

/// Statistics from the writer thread.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriterStats {
    pub writes: usize,
    pub failures: usize,
    /// Submissions replaced by a newer state before they were written.
    pub coalesced: usize,
}

#[derive(Default)]
struct Pending {
    latest: Option<Arc<UserDataState>>,
    submitted: u64,
    written: u64,
    stop: bool,
    /// The thread has returned; nothing more will be written.
    exited: bool,
    stats: WriterStats,
}

#[derive(Default)]
struct Shared {
    pending: Mutex<Pending>,
    wake: Condvar,
    done: Condvar,
}

/// A background thread that writes submitted states through a [`PersistenceAdapter`].
///
/// Dropping the writer flushes outstanding work and joins the thread.
pub struct PersistenceWriter {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl PersistenceWriter {
    pub fn spawn(adapter: PersistenceAdapter) -> Self {
        let shared = Arc::new(Shared::default());
        let worker = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name("userdata-writer".into())
            .spawn(move || run(adapter, worker));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("could not start persistence writer: {}", err);
                None
            }
        };

        Self { shared, handle }
    }

    /// Queue `state` for writing. Never blocks on storage.
    pub fn submit(&self, state: Arc<UserDataState>) {
        let mut pending = self.shared.pending.lock();
        if pending.latest.replace(state).is_some() {
            pending.stats.coalesced += 1;
        }
        pending.submitted += 1;
        self.shared.wake.notify_one();
    }

    /// Block until every state submitted so far has been written (or has
    /// failed to write).
    pub fn flush(&self) {
        if self.handle.is_none() {
            return;
        }
        let mut pending = self.shared.pending.lock();
        let target = pending.submitted;
        while pending.written < target && !pending.exited {
            self.shared.done.wait(&mut pending);
        }
    }

    pub fn stats(&self) -> WriterStats {
        self.shared.pending.lock().stats.clone()
    }

    /// Flush, stop the thread and return its statistics.
    pub fn stop(mut self) -> WriterStats {
        self.shutdown();
        self.stats()
    }

    fn shutdown(&mut self) {
        {
            let mut pending = self.shared.pending.lock();
            pending.stop = true;
            self.shared.wake.notify_one();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("persistence writer thread panicked");
            }
        }
    }
}

impl Drop for PersistenceWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Marks the writer as gone however `run` returns, so `flush` cannot wait on it.
struct ExitGuard<'a>(&'a Shared);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        let mut pending = self.0.pending.lock();
        pending.exited = true;
        self.0.done.notify_all();
    }
}

fn run(adapter: PersistenceAdapter, shared: Arc<Shared>) {
    let _exit = ExitGuard(&shared);
    loop {
        let (state, sequence) = {
            let mut pending = shared.pending.lock();
            while pending.latest.is_none() && !pending.stop {
                shared.wake.wait(&mut pending);
            }
            match pending.latest.take() {
                Some(state) => (state, pending.submitted),
                None => return,
            }
        };

        // A storage that panics counts as a failed write; the thread keeps serving.
        let ok = match panic::catch_unwind(AssertUnwindSafe(|| adapter.save(&state))) {
            Ok(ok) => ok,
            Err(_) => {
                log::warn!("storage panicked while writing {}", adapter.key());
                false
            }
        };

        let mut pending = shared.pending.lock();
        pending.stats.writes += 1;
        if !ok {
            pending.stats.failures += 1;
        }
        pending.written = sequence;
        shared.done.notify_all();
    }
}
