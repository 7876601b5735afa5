use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{FieldViolation, ServiceError, ServiceResult},
    format::parse_date,
};

/// Lifecycle of a schedule row. `Booked` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldScheduleStatus {
    #[default]
    Available,
    Booked,
}

impl FieldScheduleStatus {
    /// Value stored in the `field_schedules.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldScheduleStatus::Available => "available",
            FieldScheduleStatus::Booked => "booked",
        }
    }
}

impl fmt::Display for FieldScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldScheduleStatus::Available => f.write_str("Available"),
            FieldScheduleStatus::Booked => f.write_str("Booked"),
        }
    }
}

impl FromStr for FieldScheduleStatus {
    type Err = ServiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "available" => Ok(FieldScheduleStatus::Available),
            "booked" => Ok(FieldScheduleStatus::Booked),
            other => Err(ServiceError::invalid(
                "status",
                format!("unknown schedule status {other:?}"),
            )),
        }
    }
}

fn parse_uuid(field: &str, raw: &str, violations: &mut Vec<FieldViolation>) -> Option<Uuid> {
    if raw.trim().is_empty() {
        violations.push(FieldViolation::new(field, "is required"));
        return None;
    }
    match Uuid::parse_str(raw.trim()) {
        Ok(uuid) => Some(uuid),
        Err(_) => {
            violations.push(FieldViolation::new(field, "must be a valid UUID"));
            None
        }
    }
}

fn parse_required_date(raw: &str, violations: &mut Vec<FieldViolation>) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        violations.push(FieldViolation::new("date", "is required"));
        return None;
    }
    let date = parse_date(raw);
    if date.is_none() {
        violations.push(FieldViolation::new("date", "must be formatted as YYYY-MM-DD"));
    }
    date
}

fn parse_uuid_list(
    field: &str,
    raw: &[String],
    violations: &mut Vec<FieldViolation>,
) -> Vec<Uuid> {
    if raw.is_empty() {
        violations.push(FieldViolation::new(field, "must contain at least one id"));
        return Vec::new();
    }
    raw.iter()
        .enumerate()
        .filter_map(|(index, value)| parse_uuid(&format!("{field}[{index}]"), value, violations))
        .collect()
}

fn finish<T>(value: Option<T>, violations: Vec<FieldViolation>) -> ServiceResult<T> {
    match value {
        Some(value) if violations.is_empty() => Ok(value),
        _ => Err(ServiceError::Validation(violations)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFieldScheduleRequest {
    #[serde(rename = "fieldID", default)]
    pub field_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "timeIDs", default)]
    pub time_ids: Vec<String>,
}

/// A create request after its identifiers and date have been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFieldSchedules {
    pub field_id: Uuid,
    pub date: NaiveDate,
    pub time_ids: Vec<Uuid>,
}

impl CreateFieldScheduleRequest {
    pub fn validate(&self) -> ServiceResult<NewFieldSchedules> {
        let mut violations = Vec::new();
        let field_id = parse_uuid("fieldID", &self.field_id, &mut violations);
        let date = parse_required_date(&self.date, &mut violations);
        let time_ids = parse_uuid_list("timeIDs", &self.time_ids, &mut violations);

        let parsed = match (field_id, date) {
            (Some(field_id), Some(date)) => Some(NewFieldSchedules {
                field_id,
                date,
                time_ids,
            }),
            _ => None,
        };
        finish(parsed, violations)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFieldScheduleForOneMonthRequest {
    #[serde(rename = "fieldID", default)]
    pub field_id: String,
}

impl GenerateFieldScheduleForOneMonthRequest {
    pub fn validate(&self) -> ServiceResult<Uuid> {
        let mut violations = Vec::new();
        let field_id = parse_uuid("fieldID", &self.field_id, &mut violations);
        finish(field_id, violations)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFieldScheduleRequest {
    #[serde(default)]
    pub date: String,
    #[serde(rename = "timeID", default)]
    pub time_id: String,
}

impl UpdateFieldScheduleRequest {
    pub fn validate(&self) -> ServiceResult<(NaiveDate, Uuid)> {
        let mut violations = Vec::new();
        let date = parse_required_date(&self.date, &mut violations);
        let time_id = parse_uuid("timeID", &self.time_id, &mut violations);
        let parsed = match (date, time_id) {
            (Some(date), Some(time_id)) => Some((date, time_id)),
            _ => None,
        };
        finish(parsed, violations)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusFieldScheduleRequest {
    #[serde(rename = "fieldScheduleIDs", default)]
    pub field_schedule_ids: Vec<String>,
}

impl UpdateStatusFieldScheduleRequest {
    pub fn validate(&self) -> ServiceResult<Vec<Uuid>> {
        let mut violations = Vec::new();
        let ids = parse_uuid_list("fieldScheduleIDs", &self.field_schedule_ids, &mut violations);
        finish(Some(ids), violations)
    }
}

/// Query string of the booking-facing listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldScheduleByDateQuery {
    #[serde(default)]
    pub date: String,
}

impl FieldScheduleByDateQuery {
    pub fn validate(&self) -> ServiceResult<NaiveDate> {
        let mut violations = Vec::new();
        let date = parse_required_date(&self.date, &mut violations);
        finish(date, violations)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldScheduleResponse {
    pub uuid: Uuid,
    pub field_name: String,
    pub price_per_hour: i32,
    pub date: String,
    pub status: FieldScheduleStatus,
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldScheduleForBookingResponse {
    pub uuid: Uuid,
    pub price_per_hour: String,
    pub date: String,
    pub status: FieldScheduleStatus,
    pub time: String,
}
