use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Sources of non-determinism the transition function needs.
///
/// `AddAchievement` needs a fresh id and `ToggleAchievement` needs the current
/// time. Everything else in [`reduce`](super::reduce) is a pure function of its
/// inputs.
pub trait Environment: Send + Sync {
    /// Milliseconds since the unix epoch.
    fn now_millis(&self) -> i64;

    /// A new achievement id, unique for the lifetime of the data.
    fn next_id(&self) -> String;
}

/// Wall clock plus random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic environment: a manually advanced clock and sequential ids.
///
/// Useful for tests and for replaying recorded sessions.
#[derive(Debug)]
pub struct FixedEnvironment {
    now: AtomicI64,
    next: AtomicU64,
}

impl FixedEnvironment {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
            next: AtomicU64::new(1),
        }
    }

    pub fn set_now(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Default for FixedEnvironment {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Environment for FixedEnvironment {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> String {
        format!("ach-{}", self.next.fetch_add(1, Ordering::SeqCst))
    }
}
