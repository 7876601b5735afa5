use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FieldViolation, ServiceError, ServiceResult};

/// Upper bound for a single uploaded field image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Column widths of `fields.code` and `fields.name`.
pub const MAX_CODE_CHARS: usize = 15;
pub const MAX_NAME_CHARS: usize = 100;

/// An image file received with a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Field attributes shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct FieldRequest {
    pub code: String,
    pub name: String,
    pub price_per_hour: i32,
    /// `None` when the request carried no image part at all.
    pub images: Option<Vec<UploadedImage>>,
}

impl FieldRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut violations = Vec::new();

        let code = self.code.trim();
        if code.is_empty() {
            violations.push(FieldViolation::new("code", "is required"));
        } else if code.chars().count() > MAX_CODE_CHARS {
            violations.push(FieldViolation::new(
                "code",
                format!("must be at most {MAX_CODE_CHARS} characters"),
            ));
        }

        let name = self.name.trim();
        if name.is_empty() {
            violations.push(FieldViolation::new("name", "is required"));
        } else if name.chars().count() > MAX_NAME_CHARS {
            violations.push(FieldViolation::new(
                "name",
                format!("must be at most {MAX_NAME_CHARS} characters"),
            ));
        }
        if self.price_per_hour <= 0 {
            violations.push(FieldViolation::new("pricePerHour", "must be greater than 0"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(violations))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResponse {
    pub uuid: Uuid,
    pub code: String,
    pub name: String,
    pub price_per_hour: i32,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
