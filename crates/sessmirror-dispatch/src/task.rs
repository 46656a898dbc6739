//! Mutation-task model: what a pending session change wants done remotely.

use sessmirror_cache::NO_LIFESPAN;

/// Remote-cache primitive a mutation task maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    /// Unconditional put; overwrites any existing remote value.
    Add,
    /// Put only if the key is absent remotely; a pre-existing value is a
    /// fatal conflict.
    AddIfAbsent,
    /// No remote call; removal is enforced by the remote store's own
    /// removal/expiration listener layer.
    Remove,
    /// Versioned compare-and-swap replace of a freshly fetched copy.
    Replace,
}

/// Whether a mutation needs cross-DC propagation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossDcStatus {
    /// The mutation must be mirrored to the remote cache.
    SyncNeeded,
    /// Propagation is pointless for this entity state (e.g. the change is
    /// already known to be remote-sourced); skip silently.
    NotNeeded,
}

/// One pending change to a session entity, plus its propagation policy.
///
/// The task computes its own operation and cross-DC status from the entity
/// snapshot, so callers never need to know the mapping scheme. Concrete
/// mutations (login, refresh, logout, revalidation) implement this trait.
pub trait SessionUpdateTask<V>: Send + Sync {
    /// The remote primitive this task maps to, given the local snapshot.
    fn operation(&self, snapshot: &V) -> CacheOperation;

    /// Whether this task needs cross-DC propagation, given the local snapshot.
    fn cross_dc_status(&self, snapshot: &V) -> CrossDcStatus;

    /// Absolute time-to-live for the replicated entry in milliseconds;
    /// [`NO_LIFESPAN`] disables absolute expiry. Defaults to no expiry.
    fn lifespan_ms(&self) -> i64 {
        NO_LIFESPAN
    }

    /// Apply the mutation to an entity fetched fresh from the remote store.
    /// Invoked only for [`CacheOperation::Replace`], once per replace attempt.
    fn apply(&self, entity: &mut V);
}
