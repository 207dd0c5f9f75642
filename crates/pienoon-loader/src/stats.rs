//! Job counters that can be read without taking the queue lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counter snapshot returned by [`LoaderStats::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LoaderStatsSnapshot {
    /// Jobs handed to `queue_job`.
    pub queued: u64,
    /// Jobs whose `load` has returned.
    pub loaded: u64,
    /// Jobs whose `finalize` has returned.
    pub finalized: u64,
}

impl LoaderStatsSnapshot {
    /// Jobs queued but not yet loaded.
    pub fn awaiting_load(&self) -> u64 {
        self.queued.saturating_sub(self.loaded)
    }

    /// Jobs loaded but not yet finalized.
    pub fn awaiting_finalize(&self) -> u64 {
        self.loaded.saturating_sub(self.finalized)
    }
}

/// Atomic job counters.
///
/// Counters use `Ordering::Relaxed`; they are for monitoring, and a snapshot
/// taken while jobs are moving may be one step behind the queues.
#[derive(Debug, Default)]
pub struct LoaderStats {
    queued: AtomicU64,
    loaded: AtomicU64,
    finalized: AtomicU64,
}

impl LoaderStats {
    /// All counters at zero.
    pub const fn new() -> Self {
        Self {
            queued: AtomicU64::new(0),
            loaded: AtomicU64::new(0),
            finalized: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn inc_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_loaded(&self) {
        self.loaded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_finalized(&self) {
        self.finalized.fetch_add(1, Ordering::Relaxed);
    }

    /// Read every counter.
    pub fn snapshot(&self) -> LoaderStatsSnapshot {
        LoaderStatsSnapshot {
            queued: self.queued.load(Ordering::Relaxed),
            loaded: self.loaded.load(Ordering::Relaxed),
            finalized: self.finalized.load(Ordering::Relaxed),
        }
    }
}
