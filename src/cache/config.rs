//! Read-through cache configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_TTL_SECONDS: u64 = 60;
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 250;
const DEFAULT_INVALIDATION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MEMORY_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// When false every read goes straight to the primary store.
    pub enabled: bool,
    /// Lifetime of every entry written back after a primary read.
    pub ttl: Duration,
    /// Upper bound on a single cache lookup.
    pub lookup_timeout: Duration,
    /// Upper bound on dropping the entries a write made stale. Prefix deletes
    /// walk the keyspace, so this is larger than `lookup_timeout`.
    pub invalidation_timeout: Duration,
    /// Entry limit of the in-process fallback store.
    pub memory_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            lookup_timeout: Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
            invalidation_timeout: Duration::from_millis(DEFAULT_INVALIDATION_TIMEOUT_MS),
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ttl: Duration::from_secs(settings.ttl_seconds.get()),
            lookup_timeout: Duration::from_millis(settings.lookup_timeout_ms.get()),
            invalidation_timeout: Duration::from_millis(settings.invalidation_timeout_ms.get()),
            memory_capacity: settings.memory_capacity,
        }
    }
}

impl CacheConfig {
    /// Returns the memory capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn memory_capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
