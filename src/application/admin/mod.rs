//! Application services for the administrative surface.
//!
//! Admin views read across owners, straight from the primary store.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{DirectoryRepo, RepoError};
use crate::domain::entities::{EventRecord, FunctionRecord, UserRecord};
use crate::domain::types::RecordId;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn DirectoryRepo<UserRecord>>,
    events: Arc<dyn DirectoryRepo<EventRecord>>,
    functions: Arc<dyn DirectoryRepo<FunctionRecord>>,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn DirectoryRepo<UserRecord>>,
        events: Arc<dyn DirectoryRepo<EventRecord>>,
        functions: Arc<dyn DirectoryRepo<FunctionRecord>>,
    ) -> Self {
        Self {
            users,
            events,
            functions,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AdminError> {
        self.users.list_all().await.map_err(AdminError::from)
    }

    pub async fn get_user(&self, raw_id: &str) -> Result<UserRecord, AdminError> {
        find_one(self.users.as_ref(), raw_id, "user").await
    }

    pub async fn list_events(&self) -> Result<Vec<EventRecord>, AdminError> {
        self.events.list_all().await.map_err(AdminError::from)
    }

    pub async fn get_event(&self, raw_id: &str) -> Result<EventRecord, AdminError> {
        find_one(self.events.as_ref(), raw_id, "event").await
    }

    pub async fn list_functions(&self) -> Result<Vec<FunctionRecord>, AdminError> {
        self.functions.list_all().await.map_err(AdminError::from)
    }

    pub async fn get_function(&self, raw_id: &str) -> Result<FunctionRecord, AdminError> {
        find_one(self.functions.as_ref(), raw_id, "function").await
    }
}

async fn find_one<T>(
    repo: &dyn DirectoryRepo<T>,
    raw_id: &str,
    what: &'static str,
) -> Result<T, AdminError> {
    let id =
        RecordId::parse(raw_id).map_err(|err| AdminError::InvalidParameter(err.to_string()))?;
    repo.find_by_id(id).await?.ok_or(AdminError::NotFound(what))
}
