use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::pagination::PageRequest,
    application::repos::{DirectoryRepo, OwnedRecordsRepo, OwnedRecordsWriteRepo, RepoError},
    domain::entities::{EventDraft, EventRecord},
    domain::types::{OwnerId, RecordId},
};

use super::{PostgresRepositories, map_sqlx_error};

const EVENT_COLUMNS: &str = "id, user_id, event_name, event_type, attendance, description, \
    is_public, status, location, image_url, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    user_id: Uuid,
    event_name: String,
    event_type: String,
    attendance: i32,
    description: String,
    is_public: bool,
    status: String,
    location: String,
    image_url: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            event_name: row.event_name,
            event_type: row.event_type,
            attendance: row.attendance,
            description: row.description,
            is_public: row.is_public,
            status: row.status,
            location: row.location,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl OwnedRecordsRepo<EventRecord> for PostgresRepositories {
    async fn count_for_owner(&self, owner: OwnerId) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE user_id = $1")
            .bind(owner.as_uuid())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn list_for_owner(
        &self,
        owner: OwnerId,
        page: PageRequest,
    ) -> Result<Vec<EventRecord>, RepoError> {
        let (limit, offset) = Self::window(page);
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        );

        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(owner.as_uuid())
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(EventRecord::from).collect())
    }

    async fn find_for_owner(
        &self,
        owner: OwnerId,
        id: RecordId,
    ) -> Result<Option<EventRecord>, RepoError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND user_id = $2");

        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(EventRecord::from))
    }
}

#[async_trait]
impl OwnedRecordsWriteRepo<EventRecord> for PostgresRepositories {
    async fn insert(&self, owner: OwnerId, draft: EventDraft) -> Result<EventRecord, RepoError> {
        let sql = format!(
            "INSERT INTO events (id, user_id, event_name, event_type, attendance, description, \
             is_public, status, location, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {EVENT_COLUMNS}"
        );

        let row: EventRow = sqlx::query_as(&sql)
            .bind(RecordId::generate().as_uuid())
            .bind(owner.as_uuid())
            .bind(draft.event_name)
            .bind(draft.event_type)
            .bind(draft.attendance)
            .bind(draft.description)
            .bind(draft.is_public)
            .bind(draft.status)
            .bind(draft.location)
            .bind(draft.image_url)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_for_owner(
        &self,
        owner: OwnerId,
        id: RecordId,
        draft: EventDraft,
    ) -> Result<Option<EventRecord>, RepoError> {
        let sql = format!(
            "UPDATE events SET event_name = $3, event_type = $4, attendance = $5, \
             description = $6, is_public = $7, status = $8, location = $9, image_url = $10, \
             updated_at = now() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {EVENT_COLUMNS}"
        );

        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .bind(draft.event_name)
            .bind(draft.event_type)
            .bind(draft.attendance)
            .bind(draft.description)
            .bind(draft.is_public)
            .bind(draft.status)
            .bind(draft.location)
            .bind(draft.image_url)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(EventRecord::from))
    }

    async fn delete_for_owner(&self, owner: OwnerId, id: RecordId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_owner(&self, owner: OwnerId) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM events WHERE user_id = $1")
            .bind(owner.as_uuid())
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl DirectoryRepo<EventRecord> for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<EventRecord>, RepoError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC");

        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(EventRecord::from).collect())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<EventRecord>, RepoError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");

        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(EventRecord::from))
    }
}
