use async_trait::async_trait;
use chrono::Utc;
use fieldbook_core::errors::ServiceResult;
use mockall::automock;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::storage_error;
use crate::models::DbTime;

#[automock]
#[async_trait]
pub trait TimeRepository: Send + Sync {
    async fn find_all(&self) -> ServiceResult<Vec<DbTime>>;

    async fn find_by_uuid(&self, uuid: Uuid) -> ServiceResult<Option<DbTime>>;

    async fn find_by_id(&self, id: i32) -> ServiceResult<Option<DbTime>>;

    /// Inserts a slot under a freshly generated UUID. Identical start/end
    /// pairs are accepted.
    async fn create(&self, start_time: &str, end_time: &str) -> ServiceResult<DbTime>;
}

#[derive(Debug, Clone)]
pub struct PgTimeRepository {
    pool: Pool<Postgres>,
}

impl PgTimeRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimeRepository for PgTimeRepository {
    async fn find_all(&self) -> ServiceResult<Vec<DbTime>> {
        sqlx::query_as::<_, DbTime>(
            r#"
            SELECT id, uuid, start_time, end_time, created_at, updated_at
            FROM times
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Time"))
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> ServiceResult<Option<DbTime>> {
        sqlx::query_as::<_, DbTime>(
            r#"
            SELECT id, uuid, start_time, end_time, created_at, updated_at
            FROM times
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Time"))
    }

    async fn find_by_id(&self, id: i32) -> ServiceResult<Option<DbTime>> {
        sqlx::query_as::<_, DbTime>(
            r#"
            SELECT id, uuid, start_time, end_time, created_at, updated_at
            FROM times
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Time"))
    }

    async fn create(&self, start_time: &str, end_time: &str) -> ServiceResult<DbTime> {
        let uuid = Uuid::new_v4();
        let now = Utc::now();

        tracing::debug!(%uuid, start_time, end_time, "Creating time slot");

        sqlx::query_as::<_, DbTime>(
            r#"
            INSERT INTO times (uuid, start_time, end_time, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, uuid, start_time, end_time, created_at, updated_at
            "#,
        )
        .bind(uuid)
        .bind(start_time)
        .bind(end_time)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("Time"))
    }
}
