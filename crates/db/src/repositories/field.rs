use async_trait::async_trait;
use chrono::Utc;
use fieldbook_core::{errors::ServiceResult, pagination::PageRequest};
use mockall::automock;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::storage_error;
use crate::models::{DbField, NewField};

/// Columns `GET /field/pagination` may sort by; the first is the default.
pub const FIELD_SORT_COLUMNS: &[&str] =
    &["created_at", "updated_at", "code", "name", "price_per_hour"];

const FIELD_COLUMNS: &str = "id, uuid, code, name, price_per_hour, images, created_at, updated_at";

#[automock]
#[async_trait]
pub trait FieldRepository: Send + Sync {
    /// One page of fields plus the total field count.
    async fn find_all_paginated(&self, page: &PageRequest) -> ServiceResult<(Vec<DbField>, i64)>;

    async fn find_all(&self) -> ServiceResult<Vec<DbField>>;

    async fn find_by_uuid(&self, uuid: Uuid) -> ServiceResult<Option<DbField>>;

    async fn create(&self, field: NewField) -> ServiceResult<DbField>;

    async fn update(&self, uuid: Uuid, field: NewField) -> ServiceResult<Option<DbField>>;

    /// Returns the number of deleted rows.
    async fn delete(&self, uuid: Uuid) -> ServiceResult<u64>;
}

#[derive(Debug, Clone)]
pub struct PgFieldRepository {
    pool: Pool<Postgres>,
}

impl PgFieldRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldRepository for PgFieldRepository {
    async fn find_all_paginated(&self, page: &PageRequest) -> ServiceResult<(Vec<DbField>, i64)> {
        // sort_column comes from FIELD_SORT_COLUMNS, never from the caller
        let sql = format!(
            "SELECT {FIELD_COLUMNS} FROM fields ORDER BY {} {}, id ASC LIMIT $1 OFFSET $2",
            page.sort_column,
            page.sort_order.as_sql()
        );

        let fields = sqlx::query_as::<_, DbField>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Field"))?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fields")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Field"))?;

        Ok((fields, total))
    }

    async fn find_all(&self) -> ServiceResult<Vec<DbField>> {
        sqlx::query_as::<_, DbField>(&format!(
            "SELECT {FIELD_COLUMNS} FROM fields ORDER BY created_at DESC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Field"))
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> ServiceResult<Option<DbField>> {
        sqlx::query_as::<_, DbField>(&format!(
            "SELECT {FIELD_COLUMNS} FROM fields WHERE uuid = $1"
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Field"))
    }

    async fn create(&self, field: NewField) -> ServiceResult<DbField> {
        let uuid = Uuid::new_v4();
        let now = Utc::now();

        tracing::debug!(%uuid, code = %field.code, "Creating field");

        sqlx::query_as::<_, DbField>(&format!(
            r#"
            INSERT INTO fields (uuid, code, name, price_per_hour, images, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(uuid)
        .bind(&field.code)
        .bind(&field.name)
        .bind(field.price_per_hour)
        .bind(field.images.as_slice())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("Field"))
    }

    async fn update(&self, uuid: Uuid, field: NewField) -> ServiceResult<Option<DbField>> {
        sqlx::query_as::<_, DbField>(&format!(
            r#"
            UPDATE fields
            SET code = $2, name = $3, price_per_hour = $4, images = $5, updated_at = $6
            WHERE uuid = $1
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(uuid)
        .bind(&field.code)
        .bind(&field.name)
        .bind(field.price_per_hour)
        .bind(field.images.as_slice())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Field"))
    }

    async fn delete(&self, uuid: Uuid) -> ServiceResult<u64> {
        let result = sqlx::query("DELETE FROM fields WHERE uuid = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(storage_error("Field"))?;

        Ok(result.rows_affected())
    }
}
