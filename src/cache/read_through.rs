//! Cache-aside reads for owner-scoped resources.
//!
//! A read first consults the cache under a short lookup timeout. Hits are
//! returned as-is; misses, timeouts, unreachable stores and undecodable
//! entries all fall through to the primary store, whose answer is written back
//! best-effort. The whole read is bounded by the request deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::application::envelope::Sourced;
use crate::application::pagination::{PageRequest, PageResult};
use crate::application::repos::{OwnedRecordsRepo, RepoError};
use crate::domain::resource::OwnedResource;
use crate::domain::types::{OwnerId, RecordId};

use super::config::CacheConfig;
use super::keys::{CacheKey, owner_item_prefix, owner_list_prefix};
use super::store::{CacheError, CacheStore};

const SOURCE: &str = "eventdesk::cache::read_through";

pub const METRIC_CACHE_HIT: &str = "eventdesk_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "eventdesk_cache_miss_total";
pub const METRIC_CACHE_CORRUPT: &str = "eventdesk_cache_corrupt_total";
pub const METRIC_CACHE_UNAVAILABLE: &str = "eventdesk_cache_unavailable_total";
pub const METRIC_CACHE_WRITE_FAILED: &str = "eventdesk_cache_write_failed_total";
pub const METRIC_CACHE_INVALIDATE: &str = "eventdesk_cache_invalidate_total";

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Primary(#[from] RepoError),
    #[error("request exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),
}

/// Which cached entries a write made stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// One record changed; its item entry and every list page go.
    Record(RecordId),
    /// Every record of the owner changed.
    AllRecords,
}

pub struct ReadThrough<R: OwnedResource> {
    reader: Arc<dyn OwnedRecordsRepo<R>>,
    cache: Option<Arc<dyn CacheStore>>,
    config: CacheConfig,
    request_deadline: Duration,
}

impl<R: OwnedResource> ReadThrough<R> {
    /// A disabled `config` discards `cache` so every read goes to the primary store.
    pub fn new(
        reader: Arc<dyn OwnedRecordsRepo<R>>,
        cache: Option<Arc<dyn CacheStore>>,
        config: CacheConfig,
        request_deadline: Duration,
    ) -> Self {
        let cache = if config.enabled { cache } else { None };
        Self {
            reader,
            cache,
            config,
            request_deadline,
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// One page of the owner's records, newest first.
    pub async fn get_list(
        &self,
        owner: OwnerId,
        page: PageRequest,
    ) -> Result<Sourced<PageResult<R>>, ReadError> {
        self.within_deadline(self.list_inner(owner, page)).await
    }

    /// A single record of the owner. `raw_id` is validated before any I/O.
    pub async fn get_item(&self, owner: OwnerId, raw_id: &str) -> Result<Sourced<R>, ReadError> {
        let id = RecordId::parse(raw_id)
            .map_err(|err| ReadError::InvalidParameter(err.to_string()))?;
        self.within_deadline(self.item_inner(owner, id)).await
    }

    /// Drop cached entries made stale by a write. Failures are logged only.
    pub async fn invalidate(&self, owner: OwnerId, scope: Invalidation) {
        let Some(cache) = self.cache.as_deref() else {
            return;
        };
        let kind = R::KIND;

        self.delete_prefix(cache, &owner_list_prefix(kind, owner))
            .await;

        match scope {
            Invalidation::Record(id) => {
                let key = CacheKey::item(kind, owner, id);
                let outcome = self
                    .bounded(self.config.invalidation_timeout, cache.delete(key.as_str()))
                    .await;
                match outcome {
                    Ok(()) => {
                        counter!(METRIC_CACHE_INVALIDATE, "resource" => kind.plural())
                            .increment(1);
                    }
                    Err(err) => self.report_invalidate_failure(key.as_str(), &err),
                }
            }
            Invalidation::AllRecords => {
                self.delete_prefix(cache, &owner_item_prefix(kind, owner))
                    .await;
            }
        }
    }

    async fn list_inner(
        &self,
        owner: OwnerId,
        page: PageRequest,
    ) -> Result<Sourced<PageResult<R>>, ReadError> {
        let key = CacheKey::list(R::KIND, owner, page);

        if let Some(cache) = self.cache.as_deref()
            && let Some(hit) = self.lookup::<PageResult<R>>(cache, &key).await
        {
            return Ok(Sourced::cache(hit));
        }

        let total = self.reader.count_for_owner(owner).await?;
        let items = self.reader.list_for_owner(owner, page).await?;
        let result = PageResult::assemble(page, total, items);

        if let Some(cache) = self.cache.as_deref() {
            self.populate(cache, &key, &result).await;
        }

        Ok(Sourced::primary(result))
    }

    async fn item_inner(&self, owner: OwnerId, id: RecordId) -> Result<Sourced<R>, ReadError> {
        let key = CacheKey::item(R::KIND, owner, id);

        if let Some(cache) = self.cache.as_deref()
            && let Some(hit) = self.lookup::<R>(cache, &key).await
        {
            return Ok(Sourced::cache(hit));
        }

        let record = self
            .reader
            .find_for_owner(owner, id)
            .await?
            .ok_or(ReadError::NotFound)?;

        if let Some(cache) = self.cache.as_deref() {
            self.populate(cache, &key, &record).await;
        }

        Ok(Sourced::primary(record))
    }

    async fn within_deadline<T>(
        &self,
        read: impl Future<Output = Result<T, ReadError>>,
    ) -> Result<T, ReadError> {
        match timeout(self.request_deadline, read).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    target = SOURCE,
                    resource = R::KIND.plural(),
                    deadline_ms = self.request_deadline.as_millis() as u64,
                    "Read abandoned after request deadline"
                );
                Err(ReadError::DeadlineExceeded(self.request_deadline))
            }
        }
    }

    async fn bounded<T>(
        &self,
        limit: Duration,
        operation: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        timeout(limit, operation)
            .await
            .unwrap_or(Err(CacheError::Timeout))
    }

    async fn lookup<T: DeserializeOwned>(&self, cache: &dyn CacheStore, key: &CacheKey) -> Option<T> {
        let resource = R::KIND.plural();

        match self
            .bounded(self.config.lookup_timeout, cache.get(key.as_str()))
            .await
        {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    counter!(METRIC_CACHE_HIT, "resource" => resource).increment(1);
                    debug!(target = SOURCE, key = %key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    counter!(METRIC_CACHE_CORRUPT, "resource" => resource).increment(1);
                    warn!(
                        target = SOURCE,
                        key = %key,
                        error = %err,
                        "Discarding undecodable cache entry"
                    );
                    None
                }
            },
            Ok(None) => {
                counter!(METRIC_CACHE_MISS, "resource" => resource).increment(1);
                debug!(target = SOURCE, key = %key, "Cache miss");
                None
            }
            Err(err) => {
                counter!(METRIC_CACHE_UNAVAILABLE, "resource" => resource).increment(1);
                warn!(
                    target = SOURCE,
                    key = %key,
                    error = %err,
                    "Cache lookup failed; reading from primary store"
                );
                None
            }
        }
    }

    async fn populate<T: Serialize>(&self, cache: &dyn CacheStore, key: &CacheKey, value: &T) {
        let outcome = match serde_json::to_vec(value) {
            Ok(encoded) => {
                let bytes = Bytes::from(encoded);
                self.bounded(
                    self.config.lookup_timeout,
                    cache.set(key.as_str(), bytes, self.config.ttl),
                )
                .await
            }
            Err(err) => Err(CacheError::unavailable(format!("encode failed: {err}"))),
        };

        if let Err(err) = outcome {
            counter!(METRIC_CACHE_WRITE_FAILED, "resource" => R::KIND.plural()).increment(1);
            warn!(
                target = SOURCE,
                key = %key,
                error = %err,
                "Cache write-back failed"
            );
        }
    }

    async fn delete_prefix(&self, cache: &dyn CacheStore, prefix: &str) {
        match self
            .bounded(self.config.invalidation_timeout, cache.delete_prefix(prefix))
            .await
        {
            Ok(removed) => {
                counter!(METRIC_CACHE_INVALIDATE, "resource" => R::KIND.plural())
                    .increment(removed);
                debug!(target = SOURCE, prefix, removed, "Invalidated cached entries");
            }
            Err(err) => self.report_invalidate_failure(prefix, &err),
        }
    }

    fn report_invalidate_failure(&self, key: &str, err: &CacheError) {
        counter!(METRIC_CACHE_WRITE_FAILED, "resource" => R::KIND.plural()).increment(1);
        warn!(
            target = SOURCE,
            key,
            error = %err,
            "Cache invalidation failed; stale entries expire with their TTL"
        );
    }
}
