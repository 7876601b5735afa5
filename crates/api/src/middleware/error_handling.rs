//! # Error Handling Middleware
//!
//! This module maps [`ServiceError`] values to HTTP status codes and the
//! uniform JSON envelope every endpoint answers with:
//!
//! ```json
//! { "status": "error", "message": "Field not found", "data": null }
//! ```
//!
//! Storage and internal failures are logged here with their full detail and
//! reported to the caller with a generic message only.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fieldbook_core::{
    errors::{FieldViolation, ServiceError},
    models::response::ApiResponse,
};

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `ServiceError` instances and implements
/// `IntoResponse` to convert them into enveloped HTTP responses.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use fieldbook_api::middleware::error_handling::AppError;
/// use fieldbook_core::errors::ServiceError;
///
/// async fn handler() -> Result<Json<()>, AppError> {
///     Err(AppError(ServiceError::NotFound("Field".to_string())))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ServiceError);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::AlreadyExists(_)
            | ServiceError::Validation(_)
            | ServiceError::UploadRejected(_)
            | ServiceError::InUse(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self.0 {
            ServiceError::Validation(violations) => {
                ApiResponse::error("validation error", Some(violations))
            }
            ServiceError::Unauthorized(reason) => {
                tracing::debug!(%reason, "Rejected unauthorized request");
                ApiResponse::error("unauthorized", None)
            }
            err @ ServiceError::Database(_) => {
                tracing::error!(error = %err, "Storage failure");
                ApiResponse::error("database server failed to execute query", None)
            }
            ServiceError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                ApiResponse::error("internal server error", None)
            }
            other => ApiResponse::error(other.to_string(), None),
        };

        (status, Json(body)).into_response()
    }
}

/// Automatic conversion from ServiceError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `ServiceResult<T>` in handler functions that return `Result<T, AppError>`.
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ServiceError::Database(err))
    }
}

/// A JSON body that failed to decode is a validation failure on the body.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(ServiceError::Validation(vec![FieldViolation::new(
            "body",
            rejection.body_text(),
        )]))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(ServiceError::Validation(vec![FieldViolation::new(
            "query",
            rejection.body_text(),
        )]))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(ServiceError::Validation(vec![FieldViolation::new(
            "path",
            rejection.body_text(),
        )]))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError(ServiceError::Validation(vec![FieldViolation::new(
            "body",
            rejection.body_text(),
        )]))
    }
}

/// Maps a ServiceError to an HTTP response
///
/// # Example
///
/// ```
/// use fieldbook_api::middleware::error_handling::map_error;
/// use fieldbook_core::errors::ServiceError;
///
/// let response = map_error(ServiceError::TooManyRequests);
/// assert_eq!(response.status(), axum::http::StatusCode::TOO_MANY_REQUESTS);
/// ```
pub fn map_error(err: ServiceError) -> Response {
    AppError(err).into_response()
}
