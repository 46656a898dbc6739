//! Dispatch counters for ops reporting.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters updated on every dispatch path.
///
/// Counters are relaxed: they feed reporting, not control flow, and are safe
/// to bump from concurrent dispatch calls.
#[derive(Debug, Default)]
pub struct DispatchStats {
    dispatches: AtomicU64,
    skipped_unregistered: AtomicU64,
    skipped_not_needed: AtomicU64,
    removes_delegated: AtomicU64,
    puts: AtomicU64,
    inserts: AtomicU64,
    replaces: AtomicU64,
    replace_retries: AtomicU64,
    replace_missing: AtomicU64,
    conflicts: AtomicU64,
    retry_exhausted: AtomicU64,
}

impl DispatchStats {
    /// Create a zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_dispatch(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped_unregistered(&self) {
        self.skipped_unregistered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped_not_needed(&self) {
        self.skipped_not_needed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_remove_delegated(&self) {
        self.removes_delegated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_replace(&self) {
        self.replaces.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_replace_retries(&self, count: u64) {
        self.replace_retries.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_replace_missing(&self) {
        self.replace_missing.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retry_exhausted(&self) {
        self.retry_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            dispatches: self.dispatches.load(Ordering::Relaxed),
            skipped_unregistered: self.skipped_unregistered.load(Ordering::Relaxed),
            skipped_not_needed: self.skipped_not_needed.load(Ordering::Relaxed),
            removes_delegated: self.removes_delegated.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            replaces: self.replaces.load(Ordering::Relaxed),
            replace_retries: self.replace_retries.load(Ordering::Relaxed),
            replace_missing: self.replace_missing.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            retry_exhausted: self.retry_exhausted.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`DispatchStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStatsSnapshot {
    /// Total dispatch calls.
    pub dispatches: u64,
    /// Dispatches skipped because the cache name was not registered.
    pub skipped_unregistered: u64,
    /// Dispatches skipped because the task reported NotNeeded.
    pub skipped_not_needed: u64,
    /// Removals delegated to the remote store's listener layer.
    pub removes_delegated: u64,
    /// Unconditional puts executed.
    pub puts: u64,
    /// Successful put-if-absent inserts.
    pub inserts: u64,
    /// Successful versioned replaces.
    pub replaces: u64,
    /// Replace attempts that lost the version race and were retried.
    pub replace_retries: u64,
    /// Replaces that found the target missing (tolerated race).
    pub replace_missing: u64,
    /// Add-if-absent conflicts surfaced as errors.
    pub conflicts: u64,
    /// Replace loops that exhausted their attempt budget.
    pub retry_exhausted: u64,
}
