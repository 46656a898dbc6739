//! Registry of cross-DC-mirrored caches keyed by logical name.

use std::collections::HashMap;
use std::sync::Arc;

use sessmirror_cache::RemoteCache;

use crate::policy::IdleTimePolicy;

/// A registered remote cache together with its idle-time policy.
pub struct RegisteredCache<V> {
    /// Handle to the remote store. Shared with the external cache client;
    /// the dispatcher only invokes it, never reconfigures or closes it.
    pub cache: Arc<dyn RemoteCache<V>>,
    /// Tenant-scoped idle budget provider for this cache.
    pub idle_policy: Arc<dyn IdleTimePolicy>,
}

/// Maps logical cache names to their remote handle and idle policy.
///
/// Populated once during startup/configuration and read-only afterward; the
/// dispatcher never mutates it. A name that is not registered is simply not
/// cross-DC-mirrored, which is a valid, expected state.
pub struct CacheRegistry<V> {
    caches: HashMap<String, RegisteredCache<V>>,
}

impl<V> CacheRegistry<V> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            caches: HashMap::new(),
        }
    }

    /// Register a cache under `name`, overwriting any existing entry.
    /// Idempotent; there are no error conditions.
    ///
    /// Accepts any concrete handle type; the trait-object coercion happens
    /// here so callers never need explicit `Arc<dyn …>` annotations.
    pub fn register<C>(
        &mut self,
        name: &str,
        cache: Arc<C>,
        idle_policy: Arc<dyn IdleTimePolicy>,
    ) where
        C: RemoteCache<V> + 'static,
    {
        self.caches.insert(
            name.to_string(),
            RegisteredCache {
                cache,
                idle_policy,
            },
        );
    }

    /// Names of all registered caches, in no particular order.
    pub fn names(&self) -> Vec<&str> {
        self.caches.keys().map(String::as_str).collect()
    }

    /// Lookup the entry for `name`. Absence is not an error.
    pub fn lookup(&self, name: &str) -> Option<&RegisteredCache<V>> {
        self.caches.get(name)
    }

    /// Number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// Returns true if no caches are registered.
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

impl<V> Default for CacheRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}
