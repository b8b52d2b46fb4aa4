//! Read-through caching for owner-scoped resources.
//!
//! - [`keys`]: deterministic, owner-partitioned cache keys
//! - [`CacheStore`]: the key-value seam, with an in-process LRU implementation
//! - [`ReadThrough`]: cache-aside reads with primary fallback and write-back
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! redis_url = "redis://127.0.0.1:6379"
//! ttl_seconds = 60
//! lookup_timeout_ms = 250
//! ```

mod config;
pub mod keys;
mod lock;
mod read_through;
mod store;

pub use config::CacheConfig;
pub use keys::CacheKey;
pub use read_through::{
    Invalidation, METRIC_CACHE_CORRUPT, METRIC_CACHE_HIT, METRIC_CACHE_INVALIDATE,
    METRIC_CACHE_MISS, METRIC_CACHE_UNAVAILABLE, METRIC_CACHE_WRITE_FAILED, ReadError,
    ReadThrough,
};
pub use store::{CacheError, CacheStore, MemoryCacheStore};
