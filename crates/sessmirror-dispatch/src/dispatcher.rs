//! The replication dispatcher: decides whether and how a session mutation
//! reaches the remote cache.
//!
//! Called synchronously, in-line with the thread performing the originating
//! local mutation. Replication is best-effort mirroring layered on top of an
//! authoritative local write that has already succeeded; the caller decides
//! what a dispatch error means for that write.

use std::thread;

use tracing::{debug, warn};

use sessmirror_cache::{RemoteCache, NO_LIFESPAN};

use crate::error::DispatchError;
use crate::registry::CacheRegistry;
use crate::retry::ReplaceRetryConfig;
use crate::stats::{DispatchStats, DispatchStatsSnapshot};
use crate::task::{CacheOperation, CrossDcStatus, SessionUpdateTask};

/// How a dispatch call concluded.
///
/// No-op paths are ordinary outcomes: an unregistered cache is simply not
/// cross-DC-mirrored, and a suppressed or delegated mutation is the dominant
/// path for purely local changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The cache name is not registered; nothing was sent.
    NotMirrored,
    /// The task reported propagation is not needed; nothing was sent.
    NotNeeded,
    /// Removal is enforced by the remote store's removal/expiration listener
    /// layer; nothing was sent from here.
    RemoveDelegated,
    /// Unconditional put executed.
    Written,
    /// Put-if-absent inserted a new entry.
    Inserted,
    /// Versioned replace succeeded.
    Replaced {
        /// Replace attempts used, including the successful one.
        attempts: u32,
    },
    /// The replace target was already gone; tolerated race, key not created.
    MissingOnReplace,
}

/// Dispatches session mutations to their registered remote caches.
pub struct ReplicationDispatcher<V> {
    registry: CacheRegistry<V>,
    retry: ReplaceRetryConfig,
    stats: DispatchStats,
}

impl<V: Clone + Send + Sync> ReplicationDispatcher<V> {
    /// Create a dispatcher over a registry populated at startup.
    pub fn new(registry: CacheRegistry<V>) -> Self {
        Self::with_retry_config(registry, ReplaceRetryConfig::default())
    }

    /// Create a dispatcher with an explicit replace-retry configuration.
    pub fn with_retry_config(registry: CacheRegistry<V>, retry: ReplaceRetryConfig) -> Self {
        Self {
            registry,
            retry,
            stats: DispatchStats::new(),
        }
    }

    /// Names of the caches this dispatcher mirrors.
    pub fn registered_cache_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Point-in-time dispatch counters.
    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.stats.snapshot()
    }

    /// Propagate one pending mutation of the entity under `key` to the cache
    /// registered as `cache_name`.
    ///
    /// `snapshot` is the last known local value; the task derives its
    /// operation and propagation policy from it, and it becomes the written
    /// value for Add/AddIfAbsent. An unregistered cache name or a task that
    /// reports [`CrossDcStatus::NotNeeded`] returns without any remote call.
    pub fn dispatch(
        &self,
        tenant: &str,
        cache_name: &str,
        key: &str,
        task: &dyn SessionUpdateTask<V>,
        snapshot: &V,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.stats.record_dispatch();

        let Some(entry) = self.registry.lookup(cache_name) else {
            self.stats.record_skipped_unregistered();
            return Ok(DispatchOutcome::NotMirrored);
        };

        let operation = task.operation(snapshot);

        if task.cross_dc_status(snapshot) == CrossDcStatus::NotNeeded {
            debug!(key, cache_name, ?operation, "skipping remote write");
            self.stats.record_skipped_not_needed();
            return Ok(DispatchOutcome::NotNeeded);
        }

        // Double the idle budget so the remote entry outlives the local one:
        // a local mutation (e.g. a last-refresh timestamp) may be deferred,
        // and an entry that expired remotely first would drop the update.
        // Saturates rather than overflowing on effectively-infinite policies.
        let idle_ms = entry.idle_policy.idle_time_ms(tenant).saturating_mul(2);

        debug!(key, cache_name, ?operation, idle_ms, "running remote task");

        match operation {
            CacheOperation::Remove => {
                // Handled by the remote store's removal/expiration listeners.
                self.stats.record_remove_delegated();
                Ok(DispatchOutcome::RemoveDelegated)
            }
            CacheOperation::Add => {
                entry
                    .cache
                    .put(key, snapshot.clone(), task.lifespan_ms(), idle_ms)?;
                self.stats.record_put();
                Ok(DispatchOutcome::Written)
            }
            CacheOperation::AddIfAbsent => {
                let existing =
                    entry
                        .cache
                        .put_if_absent(key, snapshot.clone(), NO_LIFESPAN, idle_ms)?;
                if existing.is_some() {
                    self.stats.record_conflict();
                    return Err(DispatchError::Conflict {
                        key: key.to_string(),
                    });
                }
                self.stats.record_insert();
                Ok(DispatchOutcome::Inserted)
            }
            CacheOperation::Replace => {
                self.replace(entry.cache.as_ref(), key, task, task.lifespan_ms(), idle_ms)
            }
        }
    }

    /// Optimistic-concurrency replace: re-read, re-apply, re-attempt until
    /// the version check passes or the attempt budget runs out. Every retry
    /// observes the latest version, so no update is based on a stale read.
    fn replace(
        &self,
        cache: &dyn RemoteCache<V>,
        key: &str,
        task: &dyn SessionUpdateTask<V>,
        lifespan_ms: i64,
        idle_ms: u64,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut attempts = 0u32;

        while attempts < self.retry.max_attempts {
            attempts += 1;

            let Some(versioned) = cache.get_versioned(key)? else {
                // The entity may have expired or been removed concurrently.
                warn!(key, "no entity found to replace");
                self.stats.record_replace_missing();
                return Ok(DispatchOutcome::MissingOnReplace);
            };

            let mut entity = versioned.value;
            task.apply(&mut entity);

            let replaced = cache.replace_with_version(
                key,
                entity,
                versioned.version,
                lifespan_ms,
                idle_ms,
            )?;

            if replaced {
                self.stats.record_replace();
                if attempts > 1 {
                    self.stats.record_replace_retries(u64::from(attempts - 1));
                }
                debug!(key, attempts, "replaced entity in remote cache");
                return Ok(DispatchOutcome::Replaced { attempts });
            }

            debug!(key, attempt = attempts, "replace lost version race, will retry");
            if attempts < self.retry.max_attempts {
                thread::sleep(self.retry.compute_backoff(attempts - 1));
            }
        }

        self.stats.record_retry_exhausted();
        Err(DispatchError::RetryExhausted {
            key: key.to_string(),
            attempts,
        })
    }
}
