use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single rejected request field, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Validation error: {}", format_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("unauthorized")]
    Unauthorized(String),

    #[error("{0}")]
    UploadRejected(String),

    #[error("{0} is still in use")]
    InUse(String),

    #[error("too many requests")]
    TooManyRequests,

    #[error("database server failed to execute query: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ServiceError {
    /// Shorthand for a validation failure on one field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![FieldViolation::new(field, message)])
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type ServiceResult<T> = Result<T, ServiceError>;
