//! Common fixtures for dispatch integration tests: a small session entity,
//! concrete mutation tasks, and instrumented cache handles.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use sessmirror_cache::{MemoryRemoteCache, RemoteCache, RemoteCacheError, VersionedValue};
use sessmirror_dispatch::{CacheOperation, CrossDcStatus, SessionUpdateTask};

/// Minimal session entity for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub v: u32,
}

/// Login-style task: unconditional put with an explicit lifespan.
pub struct AddTask {
    pub lifespan_ms: i64,
}

impl SessionUpdateTask<Session> for AddTask {
    fn operation(&self, _snapshot: &Session) -> CacheOperation {
        CacheOperation::Add
    }

    fn cross_dc_status(&self, _snapshot: &Session) -> CrossDcStatus {
        CrossDcStatus::SyncNeeded
    }

    fn lifespan_ms(&self) -> i64 {
        self.lifespan_ms
    }

    fn apply(&self, _entity: &mut Session) {}
}

/// Task for keys expected to be locally novel.
pub struct AddIfAbsentTask;

impl SessionUpdateTask<Session> for AddIfAbsentTask {
    fn operation(&self, _snapshot: &Session) -> CacheOperation {
        CacheOperation::AddIfAbsent
    }

    fn cross_dc_status(&self, _snapshot: &Session) -> CrossDcStatus {
        CrossDcStatus::SyncNeeded
    }

    fn apply(&self, _entity: &mut Session) {}
}

/// Logout-style task: removal delegated to the remote listener layer.
pub struct RemoveTask;

impl SessionUpdateTask<Session> for RemoveTask {
    fn operation(&self, _snapshot: &Session) -> CacheOperation {
        CacheOperation::Remove
    }

    fn cross_dc_status(&self, _snapshot: &Session) -> CrossDcStatus {
        CrossDcStatus::SyncNeeded
    }

    fn apply(&self, _entity: &mut Session) {}
}

/// Refresh-style task: versioned replace adding `delta` to `v`.
pub struct ReplaceAddTask {
    pub delta: u32,
}

impl SessionUpdateTask<Session> for ReplaceAddTask {
    fn operation(&self, _snapshot: &Session) -> CacheOperation {
        CacheOperation::Replace
    }

    fn cross_dc_status(&self, _snapshot: &Session) -> CrossDcStatus {
        CrossDcStatus::SyncNeeded
    }

    fn apply(&self, entity: &mut Session) {
        entity.v += self.delta;
    }
}

/// A refresh already known to be remote-sourced: suppresses propagation.
pub struct RemoteSourcedRefreshTask;

impl SessionUpdateTask<Session> for RemoteSourcedRefreshTask {
    fn operation(&self, _snapshot: &Session) -> CacheOperation {
        CacheOperation::Replace
    }

    fn cross_dc_status(&self, _snapshot: &Session) -> CrossDcStatus {
        CrossDcStatus::NotNeeded
    }

    fn apply(&self, entity: &mut Session) {
        entity.v += 1;
    }
}

/// One observed remote call, with the budgets it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Put {
        key: String,
        lifespan_ms: i64,
        max_idle_ms: u64,
    },
    PutIfAbsent {
        key: String,
        lifespan_ms: i64,
        max_idle_ms: u64,
    },
    GetVersioned {
        key: String,
    },
    ReplaceWithVersion {
        key: String,
        expected_version: u64,
        lifespan_ms: i64,
        max_idle_ms: u64,
    },
}

/// Cache handle that records every call while delegating to a memory backend.
pub struct RecordingCache {
    inner: MemoryRemoteCache<Session>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryRemoteCache::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inner(&self) -> &MemoryRemoteCache<Session> {
        &self.inner
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RemoteCache<Session> for RecordingCache {
    fn put(
        &self,
        key: &str,
        value: Session,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<(), RemoteCacheError> {
        self.record(RemoteCall::Put {
            key: key.to_string(),
            lifespan_ms,
            max_idle_ms,
        });
        self.inner.put(key, value, lifespan_ms, max_idle_ms)
    }

    fn put_if_absent(
        &self,
        key: &str,
        value: Session,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<Option<Session>, RemoteCacheError> {
        self.record(RemoteCall::PutIfAbsent {
            key: key.to_string(),
            lifespan_ms,
            max_idle_ms,
        });
        self.inner.put_if_absent(key, value, lifespan_ms, max_idle_ms)
    }

    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue<Session>>, RemoteCacheError> {
        self.record(RemoteCall::GetVersioned {
            key: key.to_string(),
        });
        self.inner.get_versioned(key)
    }

    fn replace_with_version(
        &self,
        key: &str,
        value: Session,
        expected_version: u64,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<bool, RemoteCacheError> {
        self.record(RemoteCall::ReplaceWithVersion {
            key: key.to_string(),
            expected_version,
            lifespan_ms,
            max_idle_ms,
        });
        self.inner
            .replace_with_version(key, value, expected_version, lifespan_ms, max_idle_ms)
    }
}

/// Cache handle that simulates a concurrent writer winning the version race
/// on the first `conflicts` replace attempts: each interference re-puts the
/// current value, bumping the stored version so the pending replace fails.
pub struct ContendedCache {
    inner: MemoryRemoteCache<Session>,
    conflicts_left: AtomicU32,
}

impl ContendedCache {
    pub fn new(conflicts: u32) -> Self {
        Self {
            inner: MemoryRemoteCache::new(),
            conflicts_left: AtomicU32::new(conflicts),
        }
    }

    pub fn inner(&self) -> &MemoryRemoteCache<Session> {
        &self.inner
    }
}

impl RemoteCache<Session> for ContendedCache {
    fn put(
        &self,
        key: &str,
        value: Session,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<(), RemoteCacheError> {
        self.inner.put(key, value, lifespan_ms, max_idle_ms)
    }

    fn put_if_absent(
        &self,
        key: &str,
        value: Session,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<Option<Session>, RemoteCacheError> {
        self.inner.put_if_absent(key, value, lifespan_ms, max_idle_ms)
    }

    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue<Session>>, RemoteCacheError> {
        self.inner.get_versioned(key)
    }

    fn replace_with_version(
        &self,
        key: &str,
        value: Session,
        expected_version: u64,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<bool, RemoteCacheError> {
        let pending = self.conflicts_left.load(Ordering::SeqCst);
        if pending > 0 && self.conflicts_left.compare_exchange(
            pending,
            pending - 1,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ).is_ok() {
            // Interfering writer re-puts the current value first, moving the
            // version past `expected_version`.
            if let Some(current) = self.inner.get_versioned(key)? {
                self.inner
                    .put(key, current.value, lifespan_ms, max_idle_ms)?;
            }
        }
        self.inner
            .replace_with_version(key, value, expected_version, lifespan_ms, max_idle_ms)
    }
}

/// Cache handle whose every call fails with a transport error.
pub struct UnreachableCache;

impl RemoteCache<Session> for UnreachableCache {
    fn put(
        &self,
        _key: &str,
        _value: Session,
        _lifespan_ms: i64,
        _max_idle_ms: u64,
    ) -> Result<(), RemoteCacheError> {
        Err(RemoteCacheError::Timeout { timeout_ms: 50 })
    }

    fn put_if_absent(
        &self,
        _key: &str,
        _value: Session,
        _lifespan_ms: i64,
        _max_idle_ms: u64,
    ) -> Result<Option<Session>, RemoteCacheError> {
        Err(RemoteCacheError::Timeout { timeout_ms: 50 })
    }

    fn get_versioned(
        &self,
        _key: &str,
    ) -> Result<Option<VersionedValue<Session>>, RemoteCacheError> {
        Err(RemoteCacheError::Disconnected {
            msg: "peer reset".to_string(),
        })
    }

    fn replace_with_version(
        &self,
        _key: &str,
        _value: Session,
        _expected_version: u64,
        _lifespan_ms: i64,
        _max_idle_ms: u64,
    ) -> Result<bool, RemoteCacheError> {
        Err(RemoteCacheError::Timeout { timeout_ms: 50 })
    }
}

/// Idle policy returning a fixed budget for every tenant.
pub fn fixed_idle(ms: u64) -> Arc<dyn sessmirror_dispatch::IdleTimePolicy> {
    Arc::new(move |_tenant: &str| ms)
}
