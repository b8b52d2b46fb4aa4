//! Postgres-backed repository implementations.

mod events;
mod functions;
mod users;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::pagination::PageRequest;
use crate::application::repos::{HealthCheck, RepoError};
use crate::infra::error::InfraError;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), InfraError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    fn convert_count(value: i64) -> Result<u64, RepoError> {
        value
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    /// `(limit, offset)` clamped into the range Postgres accepts for bigint binds.
    fn window(page: PageRequest) -> (i64, i64) {
        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.skip()).unwrap_or(i64::MAX);
        (limit, offset)
    }
}

#[async_trait]
impl HealthCheck for PostgresRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_matches_skip_and_limit() {
        assert_eq!(PostgresRepositories::window(PageRequest::new(3, 10)), (10, 20));
    }

    #[test]
    fn window_clamps_oversized_values() {
        let (limit, offset) = PostgresRepositories::window(PageRequest::new(u64::MAX, u64::MAX));
        assert_eq!(limit, i64::MAX);
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert!(PostgresRepositories::convert_count(-1).is_err());
        assert_eq!(PostgresRepositories::convert_count(25).expect("count"), 25);
    }
}
