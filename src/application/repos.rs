//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::pagination::PageRequest;
use crate::domain::resource::OwnedResource;
use crate::domain::types::{OwnerId, RecordId};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Owner-scoped reads. Every query carries the owner in its predicate.
#[async_trait]
pub trait OwnedRecordsRepo<R: OwnedResource>: Send + Sync {
    async fn count_for_owner(&self, owner: OwnerId) -> Result<u64, RepoError>;

    /// Newest first, skipping `page.skip()` rows and returning at most `page.limit()`.
    async fn list_for_owner(&self, owner: OwnerId, page: PageRequest)
    -> Result<Vec<R>, RepoError>;

    async fn find_for_owner(&self, owner: OwnerId, id: RecordId)
    -> Result<Option<R>, RepoError>;
}

#[async_trait]
pub trait OwnedRecordsWriteRepo<R: OwnedResource>: Send + Sync {
    async fn insert(&self, owner: OwnerId, draft: R::Draft) -> Result<R, RepoError>;

    /// Returns `None` when no record matches both owner and id.
    async fn update_for_owner(
        &self,
        owner: OwnerId,
        id: RecordId,
        draft: R::Draft,
    ) -> Result<Option<R>, RepoError>;

    /// Returns whether a record was removed.
    async fn delete_for_owner(&self, owner: OwnerId, id: RecordId) -> Result<bool, RepoError>;

    async fn delete_all_for_owner(&self, owner: OwnerId) -> Result<u64, RepoError>;
}

/// Unscoped reads backing the administrative views.
#[async_trait]
pub trait DirectoryRepo<T>: Send + Sync {
    async fn list_all(&self) -> Result<Vec<T>, RepoError>;

    async fn find_by_id(&self, id: RecordId) -> Result<Option<T>, RepoError>;
}

/// Liveness probe of the primary store.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
