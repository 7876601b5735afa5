use chrono::{DateTime, NaiveDate, Utc};
use fieldbook_core::{
    errors::ServiceResult,
    models::{field::FieldResponse, field_schedule::FieldScheduleStatus, time::TimeResponse},
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTime {
    pub id: i32,
    pub uuid: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbTime> for TimeResponse {
    fn from(time: DbTime) -> Self {
        TimeResponse {
            uuid: time.uuid,
            start_time: time.start_time,
            end_time: time.end_time,
            created_at: time.created_at,
            updated_at: time.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbField {
    pub id: i32,
    pub uuid: Uuid,
    pub code: String,
    pub name: String,
    pub price_per_hour: i32,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbField> for FieldResponse {
    fn from(field: DbField) -> Self {
        FieldResponse {
            uuid: field.uuid,
            code: field.code,
            name: field.name,
            price_per_hour: field.price_per_hour,
            images: field.images,
            created_at: field.created_at,
            updated_at: field.updated_at,
        }
    }
}

/// Column values written by field create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewField {
    pub code: String,
    pub name: String,
    pub price_per_hour: i32,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFieldSchedule {
    pub id: i32,
    pub uuid: Uuid,
    pub field_id: i32,
    pub time_id: i32,
    pub date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A schedule row joined with its field and time slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFieldScheduleDetail {
    pub id: i32,
    pub uuid: Uuid,
    pub field_id: i32,
    pub time_id: i32,
    pub date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub field_name: String,
    pub price_per_hour: i32,
    pub start_time: String,
    pub end_time: String,
}

impl DbFieldScheduleDetail {
    pub fn status(&self) -> ServiceResult<FieldScheduleStatus> {
        self.status.parse()
    }
}

/// One row of a batch schedule insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFieldScheduleRow {
    pub uuid: Uuid,
    pub field_id: i32,
    pub time_id: i32,
    pub date: NaiveDate,
    pub status: FieldScheduleStatus,
}

impl NewFieldScheduleRow {
    pub fn available(field_id: i32, time_id: i32, date: NaiveDate) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            field_id,
            time_id,
            date,
            status: FieldScheduleStatus::Available,
        }
    }
}
