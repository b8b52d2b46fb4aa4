//! Cache storage seam and the in-process implementation.
//!
//! Entries are opaque bytes addressed by string keys. Every operation may fail;
//! callers treat failures as soft and carry on against the primary store.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use thiserror::Error;
use tokio::time::Instant;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "eventdesk::cache::store";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out")]
    Timeout,
}

impl CacheError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` for absent or expired entries.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every entry whose key starts with `prefix`, returning how many went.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError>;
}

struct MemoryEntry {
    value: Bytes,
    expires_at: Instant,
}

/// Bounded LRU store living inside the process.
///
/// Used when no shared cache is configured. Expiry is checked lazily on read.
pub struct MemoryCacheStore {
    entries: RwLock<LruCache<String, MemoryEntry>>,
}

impl MemoryCacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.memory_capacity_non_zero())),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::unavailable(format!("ttl {ttl:?} is out of range")))?;
        let entry = MemoryEntry { value, expires_at };
        rw_write(&self.entries, SOURCE, "set").put(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        rw_write(&self.entries, SOURCE, "delete").pop(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut entries = rw_write(&self.entries, SOURCE, "delete_prefix");
        let doomed: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            entries.pop(key);
        }
        Ok(doomed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    fn store_with_capacity(memory_capacity: usize) -> MemoryCacheStore {
        MemoryCacheStore::new(&CacheConfig {
            memory_capacity,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn set_then_get_returns_bytes() {
        let store = store_with_capacity(8);
        store
            .set("events:a:1:10", Bytes::from_static(b"{}"), Duration::from_secs(60))
            .await
            .expect("set");

        let cached = store.get("events:a:1:10").await.expect("get");
        assert_eq!(cached, Some(Bytes::from_static(b"{}")));
        assert!(store.get("events:a:2:10").await.expect("get").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_read_as_absent() {
        let store = store_with_capacity(8);
        store
            .set("event:a:b", Bytes::from_static(b"1"), Duration::from_secs(60))
            .await
            .expect("set");

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(store.get("event:a:b").await.expect("get").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.get("event:a:b").await.expect("get").is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unrepresentable_ttl_is_a_soft_error() {
        let store = store_with_capacity(4);

        let outcome = store
            .set("events:a:1:10", Bytes::from_static(b"[]"), Duration::MAX)
            .await;

        assert!(matches!(outcome, Err(CacheError::Unavailable(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_prefix_only_touches_matching_keys() {
        let store = store_with_capacity(16);
        let ttl = Duration::from_secs(60);
        for key in ["events:a:1:10", "events:a:2:10", "events:b:1:10", "event:a:x"] {
            store
                .set(key, Bytes::from_static(b"[]"), ttl)
                .await
                .expect("set");
        }

        let removed = store.delete_prefix("events:a:").await.expect("delete");
        assert_eq!(removed, 2);
        assert!(store.get("events:b:1:10").await.expect("get").is_some());
        assert!(store.get("event:a:x").await.expect("get").is_some());
    }

    #[tokio::test]
    async fn lru_evicts_oldest_entry() {
        let store = store_with_capacity(2);
        let ttl = Duration::from_secs(60);
        store.set("k1", Bytes::from_static(b"1"), ttl).await.expect("set");
        store.set("k2", Bytes::from_static(b"2"), ttl).await.expect("set");
        store.set("k3", Bytes::from_static(b"3"), ttl).await.expect("set");

        assert!(store.get("k1").await.expect("get").is_none());
        assert!(store.get("k2").await.expect("get").is_some());
        assert!(store.get("k3").await.expect("get").is_some());
    }

    #[tokio::test]
    async fn store_recovers_from_poisoned_lock() {
        let store = store_with_capacity(4);

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.entries.write().expect("entries lock should be acquired");
            panic!("poison entries lock");
        }));

        store
            .set("k", Bytes::from_static(b"v"), Duration::from_secs(1))
            .await
            .expect("set");
        assert!(store.get("k").await.expect("get").is_some());
    }
}
