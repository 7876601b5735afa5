use serde::{Deserialize, Serialize};

use crate::errors::FieldViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Uniform envelope wrapped around every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: "success".to_string(),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Success,
            message: "success".to_string(),
            data: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>, errors: Option<Vec<FieldViolation>>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
            errors,
        }
    }
}
