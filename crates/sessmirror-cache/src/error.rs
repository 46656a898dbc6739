//! Error types for the remote-cache boundary.

use thiserror::Error;

/// Transport-level failures raised by a remote cache handle.
///
/// The replication core never interprets these; they propagate unchanged to
/// the caller, whose own policy decides whether the originating local
/// mutation is rolled back, retried, or logged.
#[derive(Debug, Error)]
pub enum RemoteCacheError {
    /// The remote call did not complete within the client's deadline.
    #[error("remote cache call timed out after {timeout_ms}ms")]
    Timeout {
        /// The client-side deadline that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The connection to the remote cache was lost mid-call.
    #[error("remote cache disconnected: {msg}")]
    Disconnected {
        /// Description of the connection failure.
        msg: String,
    },

    /// A lower-level I/O error occurred.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
