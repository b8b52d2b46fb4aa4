//! Owner-scoped record service: cached reads plus writes that invalidate.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::envelope::Sourced;
use crate::application::pagination::{PageRequest, PageResult};
use crate::application::repos::{OwnedRecordsWriteRepo, RepoError};
use crate::cache::{Invalidation, ReadError, ReadThrough};
use crate::domain::resource::OwnedResource;
use crate::domain::types::{OwnerId, RecordId};

const SOURCE: &str = "eventdesk::application::records";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct RecordService<R: OwnedResource> {
    reads: Arc<ReadThrough<R>>,
    writer: Arc<dyn OwnedRecordsWriteRepo<R>>,
}

impl<R: OwnedResource> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            reads: self.reads.clone(),
            writer: self.writer.clone(),
        }
    }
}

impl<R: OwnedResource> RecordService<R> {
    pub fn new(reads: Arc<ReadThrough<R>>, writer: Arc<dyn OwnedRecordsWriteRepo<R>>) -> Self {
        Self { reads, writer }
    }

    pub async fn list(
        &self,
        owner: OwnerId,
        page: PageRequest,
    ) -> Result<Sourced<PageResult<R>>, ReadError> {
        self.reads.get_list(owner, page).await
    }

    pub async fn get(&self, owner: OwnerId, raw_id: &str) -> Result<Sourced<R>, ReadError> {
        self.reads.get_item(owner, raw_id).await
    }

    pub async fn create(&self, owner: OwnerId, draft: R::Draft) -> Result<R, RecordError> {
        let record = self.writer.insert(owner, draft).await?;
        let id = record.record_id();

        self.reads
            .invalidate(owner, Invalidation::Record(id))
            .await;

        info!(
            target = SOURCE,
            resource = R::KIND.plural(),
            owner = %owner,
            record = %id,
            "Record created"
        );
        Ok(record)
    }

    pub async fn update(
        &self,
        owner: OwnerId,
        raw_id: &str,
        draft: R::Draft,
    ) -> Result<R, RecordError> {
        let id = parse_id(raw_id)?;
        let record = self
            .writer
            .update_for_owner(owner, id, draft)
            .await?
            .ok_or(RecordError::NotFound)?;

        self.reads
            .invalidate(owner, Invalidation::Record(id))
            .await;

        info!(
            target = SOURCE,
            resource = R::KIND.plural(),
            owner = %owner,
            record = %id,
            "Record updated"
        );
        Ok(record)
    }

    pub async fn delete(&self, owner: OwnerId, raw_id: &str) -> Result<(), RecordError> {
        let id = parse_id(raw_id)?;
        if !self.writer.delete_for_owner(owner, id).await? {
            return Err(RecordError::NotFound);
        }

        self.reads
            .invalidate(owner, Invalidation::Record(id))
            .await;

        info!(
            target = SOURCE,
            resource = R::KIND.plural(),
            owner = %owner,
            record = %id,
            "Record deleted"
        );
        Ok(())
    }

    pub async fn delete_all(&self, owner: OwnerId) -> Result<u64, RecordError> {
        let deleted = self.writer.delete_all_for_owner(owner).await?;

        self.reads.invalidate(owner, Invalidation::AllRecords).await;

        info!(
            target = SOURCE,
            resource = R::KIND.plural(),
            owner = %owner,
            deleted,
            "Owner records deleted"
        );
        Ok(deleted)
    }
}

fn parse_id(raw: &str) -> Result<RecordId, RecordError> {
    RecordId::parse(raw).map_err(|err| RecordError::InvalidParameter(err.to_string()))
}
