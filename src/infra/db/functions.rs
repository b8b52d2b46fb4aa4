use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::pagination::PageRequest,
    application::repos::{DirectoryRepo, OwnedRecordsRepo, OwnedRecordsWriteRepo, RepoError},
    domain::entities::{FunctionDraft, FunctionRecord},
    domain::types::{OwnerId, RecordId},
};

use super::{PostgresRepositories, map_sqlx_error};

const FUNCTION_COLUMNS: &str = "id, user_id, func_name, func_type, description, is_public, \
    status, location, image_url, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct FunctionRow {
    id: Uuid,
    user_id: Uuid,
    func_name: String,
    func_type: String,
    description: String,
    is_public: bool,
    status: String,
    location: String,
    image_url: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<FunctionRow> for FunctionRecord {
    fn from(row: FunctionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            func_name: row.func_name,
            func_type: row.func_type,
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
impl OwnedRecordsRepo<FunctionRecord> for PostgresRepositories {
    async fn count_for_owner(&self, owner: OwnerId) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM functions WHERE user_id = $1")
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
    ) -> Result<Vec<FunctionRecord>, RepoError> {
        let (limit, offset) = Self::window(page);
        let sql = format!(
            "SELECT {FUNCTION_COLUMNS} FROM functions WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        );

        let rows: Vec<FunctionRow> = sqlx::query_as(&sql)
            .bind(owner.as_uuid())
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FunctionRecord::from).collect())
    }

    async fn find_for_owner(
        &self,
        owner: OwnerId,
        id: RecordId,
    ) -> Result<Option<FunctionRecord>, RepoError> {
        let sql =
            format!("SELECT {FUNCTION_COLUMNS} FROM functions WHERE id = $1 AND user_id = $2");

        let row: Option<FunctionRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(FunctionRecord::from))
    }
}

#[async_trait]
impl OwnedRecordsWriteRepo<FunctionRecord> for PostgresRepositories {
    async fn insert(
        &self,
        owner: OwnerId,
        draft: FunctionDraft,
    ) -> Result<FunctionRecord, RepoError> {
        let sql = format!(
            "INSERT INTO functions (id, user_id, func_name, func_type, description, is_public, \
             status, location, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {FUNCTION_COLUMNS}"
        );

        let row: FunctionRow = sqlx::query_as(&sql)
            .bind(RecordId::generate().as_uuid())
            .bind(owner.as_uuid())
            .bind(draft.func_name)
            .bind(draft.func_type)
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
        draft: FunctionDraft,
    ) -> Result<Option<FunctionRecord>, RepoError> {
        let sql = format!(
            "UPDATE functions SET func_name = $3, func_type = $4, description = $5, \
             is_public = $6, status = $7, location = $8, image_url = $9, updated_at = now() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {FUNCTION_COLUMNS}"
        );

        let row: Option<FunctionRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .bind(draft.func_name)
            .bind(draft.func_type)
            .bind(draft.description)
            .bind(draft.is_public)
            .bind(draft.status)
            .bind(draft.location)
            .bind(draft.image_url)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(FunctionRecord::from))
    }

    async fn delete_for_owner(&self, owner: OwnerId, id: RecordId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM functions WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_owner(&self, owner: OwnerId) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM functions WHERE user_id = $1")
            .bind(owner.as_uuid())
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl DirectoryRepo<FunctionRecord> for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<FunctionRecord>, RepoError> {
        let sql =
            format!("SELECT {FUNCTION_COLUMNS} FROM functions ORDER BY created_at DESC, id DESC");

        let rows: Vec<FunctionRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FunctionRecord::from).collect())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<FunctionRecord>, RepoError> {
        let sql = format!("SELECT {FUNCTION_COLUMNS} FROM functions WHERE id = $1");

        let row: Option<FunctionRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(FunctionRecord::from))
    }
}
