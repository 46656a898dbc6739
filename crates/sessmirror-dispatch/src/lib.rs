#![warn(missing_docs)]

//! Sessmirror dispatch subsystem: cross-DC session mutation dispatch, cache registry, replace retry
//!
//! The dispatcher sits between an application layer that produces session
//! mutations (login, refresh, logout, revalidation) and a remote cache shared
//! across datacenters. For each mutation it decides whether cross-DC
//! propagation is needed at all, computes the effective idle budget, selects
//! the remote write primitive, and executes it, resolving conditional-replace
//! conflicts with a bounded optimistic retry loop.

pub mod dispatcher;
pub mod error;
pub mod policy;
pub mod registry;
pub mod retry;
pub mod stats;
pub mod task;

pub use dispatcher::{DispatchOutcome, ReplicationDispatcher};
pub use error::DispatchError;
pub use policy::IdleTimePolicy;
pub use registry::{CacheRegistry, RegisteredCache};
pub use retry::ReplaceRetryConfig;
pub use stats::{DispatchStats, DispatchStatsSnapshot};
pub use task::{CacheOperation, CrossDcStatus, SessionUpdateTask};
