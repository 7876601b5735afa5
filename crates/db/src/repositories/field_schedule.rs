use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fieldbook_core::{
    errors::ServiceResult, models::field_schedule::FieldScheduleStatus, pagination::PageRequest,
};
use mockall::automock;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::storage_error;
use crate::models::{DbFieldSchedule, DbFieldScheduleDetail, NewFieldScheduleRow};

/// Columns `GET /field/schedule/pagination` may sort by; the first is the default.
pub const FIELD_SCHEDULE_SORT_COLUMNS: &[&str] = &["created_at", "updated_at", "date", "status"];

/// Rows per INSERT statement; keeps a batch under Postgres' bind limit.
const INSERT_CHUNK_ROWS: usize = 1000;

const DETAIL_SELECT: &str = r#"
    SELECT fs.id, fs.uuid, fs.field_id, fs.time_id, fs.date, fs.status,
           fs.created_at, fs.updated_at,
           f.name AS field_name, f.price_per_hour, t.start_time, t.end_time
    FROM field_schedules fs
    JOIN fields f ON f.id = fs.field_id
    JOIN times t ON t.id = fs.time_id
"#;

#[automock]
#[async_trait]
pub trait FieldScheduleRepository: Send + Sync {
    async fn find_all_paginated(
        &self,
        page: &PageRequest,
    ) -> ServiceResult<(Vec<DbFieldScheduleDetail>, i64)>;

    async fn find_all_by_field_id_and_date(
        &self,
        field_id: i32,
        date: NaiveDate,
    ) -> ServiceResult<Vec<DbFieldScheduleDetail>>;

    async fn find_by_uuid(&self, uuid: Uuid) -> ServiceResult<Option<DbFieldScheduleDetail>>;

    /// The row occupying a (field, time, date) slot, if any.
    async fn find_by_date_and_time_id(
        &self,
        date: NaiveDate,
        time_id: i32,
        field_id: i32,
    ) -> ServiceResult<Option<DbFieldSchedule>>;

    /// Inserts every row in one transaction: either all rows land or none do.
    async fn create_many(&self, rows: Vec<NewFieldScheduleRow>) -> ServiceResult<u64>;

    async fn update(
        &self,
        uuid: Uuid,
        date: NaiveDate,
        time_id: i32,
    ) -> ServiceResult<Option<DbFieldScheduleDetail>>;

    /// Sets the status of all given rows in a single statement.
    async fn update_status(&self, uuids: Vec<Uuid>, status: FieldScheduleStatus)
    -> ServiceResult<u64>;

    async fn delete(&self, uuid: Uuid) -> ServiceResult<u64>;
}

#[derive(Debug, Clone)]
pub struct PgFieldScheduleRepository {
    pool: Pool<Postgres>,
}

impl PgFieldScheduleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldScheduleRepository for PgFieldScheduleRepository {
    async fn find_all_paginated(
        &self,
        page: &PageRequest,
    ) -> ServiceResult<(Vec<DbFieldScheduleDetail>, i64)> {
        // sort_column comes from FIELD_SCHEDULE_SORT_COLUMNS, never from the caller
        let sql = format!(
            "{DETAIL_SELECT} ORDER BY fs.{} {}, fs.id ASC LIMIT $1 OFFSET $2",
            page.sort_column,
            page.sort_order.as_sql()
        );

        let schedules = sqlx::query_as::<_, DbFieldScheduleDetail>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Field schedule"))?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM field_schedules")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Field schedule"))?;

        Ok((schedules, total))
    }

    async fn find_all_by_field_id_and_date(
        &self,
        field_id: i32,
        date: NaiveDate,
    ) -> ServiceResult<Vec<DbFieldScheduleDetail>> {
        sqlx::query_as::<_, DbFieldScheduleDetail>(&format!(
            "{DETAIL_SELECT} WHERE fs.field_id = $1 AND fs.date = $2 ORDER BY t.start_time ASC"
        ))
        .bind(field_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Field schedule"))
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> ServiceResult<Option<DbFieldScheduleDetail>> {
        sqlx::query_as::<_, DbFieldScheduleDetail>(&format!("{DETAIL_SELECT} WHERE fs.uuid = $1"))
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Field schedule"))
    }

    async fn find_by_date_and_time_id(
        &self,
        date: NaiveDate,
        time_id: i32,
        field_id: i32,
    ) -> ServiceResult<Option<DbFieldSchedule>> {
        sqlx::query_as::<_, DbFieldSchedule>(
            r#"
            SELECT id, uuid, field_id, time_id, date, status, created_at, updated_at
            FROM field_schedules
            WHERE date = $1 AND time_id = $2 AND field_id = $3
            "#,
        )
        .bind(date)
        .bind(time_id)
        .bind(field_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Field schedule"))
    }

    async fn create_many(&self, rows: Vec<NewFieldScheduleRow>) -> ServiceResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Field schedule"))?;
        let mut inserted = 0;

        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO field_schedules (uuid, field_id, time_id, date, status, created_at, updated_at) ",
            );
            builder.push_values(chunk, |mut values, row| {
                values
                    .push_bind(row.uuid)
                    .push_bind(row.field_id)
                    .push_bind(row.time_id)
                    .push_bind(row.date)
                    .push_bind(row.status.as_str())
                    .push_bind(now)
                    .push_bind(now);
            });

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(storage_error("Field schedule"))?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(storage_error("Field schedule"))?;

        tracing::debug!(inserted, "Created field schedules");
        Ok(inserted)
    }

    async fn update(
        &self,
        uuid: Uuid,
        date: NaiveDate,
        time_id: i32,
    ) -> ServiceResult<Option<DbFieldScheduleDetail>> {
        sqlx::query_as::<_, DbFieldScheduleDetail>(
            r#"
            WITH fs AS (
                UPDATE field_schedules
                SET date = $2, time_id = $3, updated_at = $4
                WHERE uuid = $1
                RETURNING id, uuid, field_id, time_id, date, status, created_at, updated_at
            )
            SELECT fs.id, fs.uuid, fs.field_id, fs.time_id, fs.date, fs.status,
                   fs.created_at, fs.updated_at,
                   f.name AS field_name, f.price_per_hour, t.start_time, t.end_time
            FROM fs
            JOIN fields f ON f.id = fs.field_id
            JOIN times t ON t.id = fs.time_id
            "#,
        )
        .bind(uuid)
        .bind(date)
        .bind(time_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Field schedule"))
    }

    async fn update_status(
        &self,
        uuids: Vec<Uuid>,
        status: FieldScheduleStatus,
    ) -> ServiceResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE field_schedules
            SET status = $2, updated_at = $3
            WHERE uuid = ANY($1)
            "#,
        )
        .bind(uuids.as_slice())
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error("Field schedule"))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, uuid: Uuid) -> ServiceResult<u64> {
        let result = sqlx::query("DELETE FROM field_schedules WHERE uuid = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(storage_error("Field schedule"))?;

        Ok(result.rows_affected())
    }
}
