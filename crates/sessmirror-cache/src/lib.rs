#![warn(missing_docs)]

//! Sessmirror remote-cache boundary: versioned keyed store trait and in-memory backend

pub mod error;
pub mod memory;
pub mod store;

pub use error::RemoteCacheError;
pub use memory::MemoryRemoteCache;
pub use store::{RemoteCache, VersionedValue, NO_LIFESPAN};
