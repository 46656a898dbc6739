//! Versioned keyed store trait consumed by the replication dispatcher.
//!
//! This trait abstracts over the remote cache client, allowing the dispatcher
//! to run against an in-memory store in tests and a real cross-site cache
//! client in production. Every method is a blocking call on the caller's
//! thread; timeouts and reconnects are the client's own concern.

use crate::error::RemoteCacheError;

/// Lifespan sentinel meaning "no absolute expiration".
///
/// Mirrors the remote client's millisecond convention: lifespans are signed
/// and `-1` disables absolute expiry for the entry.
pub const NO_LIFESPAN: i64 = -1;

/// A value read from the remote store together with its version token.
///
/// The version token is opaque to callers beyond equality: a conditional
/// replace succeeds only while the stored version still equals the token the
/// value was read under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue<V> {
    /// The stored value.
    pub value: V,
    /// Version token the value was read under.
    pub version: u64,
}

/// Remote keyed, versioned, TTL/idle-aware store.
///
/// `lifespan_ms` is the absolute time-to-live for the entry ([`NO_LIFESPAN`]
/// disables it); `max_idle_ms` is the time-since-last-access window after
/// which the entry is eligible for expiration (`0` disables it).
pub trait RemoteCache<V>: Send + Sync {
    /// Store `value` under `key`, overwriting any existing entry.
    fn put(
        &self,
        key: &str,
        value: V,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<(), RemoteCacheError>;

    /// Store `value` under `key` only if no entry exists.
    ///
    /// Returns the pre-existing value when the store was not empty for `key`;
    /// in that case the store is left unchanged.
    fn put_if_absent(
        &self,
        key: &str,
        value: V,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<Option<V>, RemoteCacheError>;

    /// Read the value and version token for `key`. Returns `None` if the key
    /// is absent or expired.
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue<V>>, RemoteCacheError>;

    /// Replace the entry for `key` only if its version still equals
    /// `expected_version`.
    ///
    /// Returns `true` on success (the version is bumped), `false` if the
    /// entry's version moved or the entry disappeared since the read.
    fn replace_with_version(
        &self,
        key: &str,
        value: V,
        expected_version: u64,
        lifespan_ms: i64,
        max_idle_ms: u64,
    ) -> Result<bool, RemoteCacheError>;
}
