use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{FieldViolation, ServiceError, ServiceResult},
    format::parse_clock_time,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeRequest {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl CreateTimeRequest {
    /// Checks both clock times parse and describe a forward range.
    pub fn validate(&self) -> ServiceResult<()> {
        let mut violations = Vec::new();

        let start = parse_clock_time(&self.start_time);
        let end = parse_clock_time(&self.end_time);

        if self.start_time.trim().is_empty() {
            violations.push(FieldViolation::new("startTime", "is required"));
        } else if start.is_none() {
            violations.push(FieldViolation::new("startTime", "must be HH:MM or HH:MM:SS"));
        }

        if self.end_time.trim().is_empty() {
            violations.push(FieldViolation::new("endTime", "is required"));
        } else if end.is_none() {
            violations.push(FieldViolation::new("endTime", "must be HH:MM or HH:MM:SS"));
        }

        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                violations.push(FieldViolation::new("endTime", "must be after startTime"));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(violations))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeResponse {
    pub uuid: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
