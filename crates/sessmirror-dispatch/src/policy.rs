//! Tenant-scoped idle-expiration budget lookup.

/// Supplies the base idle-expiration budget for a tenant.
///
/// One provider is registered per cache, so a "user session" cache and a
/// "client session" cache can carry independent idle windows. Implementations
/// must be pure: no side effects, same answer for the same tenant.
pub trait IdleTimePolicy: Send + Sync {
    /// Base idle budget for `tenant` in milliseconds.
    fn idle_time_ms(&self, tenant: &str) -> u64;
}

impl<F> IdleTimePolicy for F
where
    F: Fn(&str) -> u64 + Send + Sync,
{
    fn idle_time_ms(&self, tenant: &str) -> u64 {
        self(tenant)
    }
}
