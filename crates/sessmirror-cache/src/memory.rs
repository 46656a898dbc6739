//! In-memory versioned store backed by a HashMap. Thread-safe via Mutex.
//!
//! Serves as the test double for the dispatcher and as a reference for the
//! expiry semantics a real remote cache client provides. Entries carry a
//! monotonically increasing version per key lifetime; expired entries are
//! dropped lazily when touched.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use tracing::trace;

use crate::error::RemoteCacheError;
use crate::store::{RemoteCache, VersionedValue};

struct Entry<V> {
    value: V,
    version: u64,
    lifespan_ms: i64,
    max_idle_ms: u64,
    written_at: Instant,
    last_access: Instant,
}

impl<V> Entry<V> {
    fn new(value: V, version: u64, lifespan_ms: i64, max_idle_ms: u64) -> Self {
        let now = Instant::now();
        Self {
            value,
            version,
            lifespan_ms,
            max_idle_ms,
            written_at: now,
            last_access: now,
        }
    }

    fn expired(&self, now: Instant) -> bool {
        if self.lifespan_ms >= 0 {
            let lived_ms = now.duration_since(self.written_at).as_millis() as u64;
            if lived_ms >= self.lifespan_ms as u64 {
                return true;
            }
        }
        if self.max_idle_ms > 0 {
            let idle_ms = now.duration_since(self.last_access).as_millis() as u64;
            if idle_ms >= self.max_idle_ms {
                return true;
            }
        }
        false
    }
}

/// In-memory [`RemoteCache`] implementation.
///
/// Lifespan and idle budgets are honored with millisecond resolution against
/// the process clock. Not intended for production use: nothing is persisted
/// and nothing is shared across processes.
pub struct MemoryRemoteCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V> MemoryRemoteCache<V> {
    /// Creates a new empty in-memory cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live (non-expired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, e| !e.expired(now));
        entries.len()
    }

    /// Returns true if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for MemoryRemoteCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> RemoteCache<V> for MemoryRemoteCache<V> {
    fn put(
        &self,
        key: &str,
        value: V,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<(), RemoteCacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let version = match entries.get(key) {
            Some(existing) => existing.version + 1,
            None => 1,
        };
        entries.insert(
            key.to_string(),
            Entry::new(value, version, lifespan_ms, max_idle_ms),
        );
        Ok(())
    }

    fn put_if_absent(
        &self,
        key: &str,
        value: V,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<Option<V>, RemoteCacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.get(key).is_some_and(|e| e.expired(now)) {
            trace!(key, "dropping expired entry on put_if_absent");
            entries.remove(key);
        }
        if let Some(existing) = entries.get_mut(key) {
            existing.last_access = now;
            return Ok(Some(existing.value.clone()));
        }
        entries.insert(
            key.to_string(),
            Entry::new(value, 1, lifespan_ms, max_idle_ms),
        );
        Ok(None)
    }

    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue<V>>, RemoteCacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.get(key).is_some_and(|e| e.expired(now)) {
            trace!(key, "dropping expired entry on read");
            entries.remove(key);
            return Ok(None);
        }
        match entries.get_mut(key) {
            Some(entry) => {
                entry.last_access = now;
                Ok(Some(VersionedValue {
                    value: entry.value.clone(),
                    version: entry.version,
                }))
            }
            None => Ok(None),
        }
    }

    fn replace_with_version(
        &self,
        key: &str,
        value: V,
        expected_version: u64,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<bool, RemoteCacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.get(key).is_some_and(|e| e.expired(now)) {
            entries.remove(key);
            return Ok(false);
        }
        match entries.get_mut(key) {
            Some(entry) if entry.version == expected_version => {
                let version = entry.version + 1;
                *entry = Entry::new(value, version, lifespan_ms, max_idle_ms);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
