//! Error types for the dispatch subsystem.

use sessmirror_cache::RemoteCacheError;
use thiserror::Error;

/// Errors surfaced by [`dispatch`](crate::ReplicationDispatcher::dispatch).
///
/// Silent no-op paths (unregistered cache, suppressed propagation, delegated
/// removal, replace target missing) are `Ok` outcomes, never errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An add-if-absent found a pre-existing remote value. The key was
    /// expected to be locally novel, so this indicates a key-generation or
    /// ordering bug upstream; it is never retried and the existing remote
    /// value is left untouched.
    #[error("existing value in remote cache for key '{key}'")]
    Conflict {
        /// The key that already held a value.
        key: String,
    },

    /// The bounded versioned-replace loop ran out of attempts under
    /// sustained contention.
    #[error("replace for key '{key}' exhausted {attempts} attempts")]
    RetryExhausted {
        /// The contended key.
        key: String,
        /// Total replace attempts made.
        attempts: u32,
    },

    /// A transport-level failure from the remote cache handle, propagated
    /// unchanged.
    #[error(transparent)]
    Remote(#[from] RemoteCacheError),
}
