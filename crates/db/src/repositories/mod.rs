//! Repository traits and their PostgreSQL implementations.
//!
//! Services depend on the traits only; `#[automock]` generates the
//! `Mock*Repository` types used by the API crate's tests.

pub mod field;
pub mod field_schedule;
pub mod time;

use fieldbook_core::errors::ServiceError;

/// Wraps a driver error once so the HTTP boundary can classify it.
///
/// Unique and foreign-key violations carry business meaning and become
/// `AlreadyExists` / `InUse` for `entity`; everything else is a storage failure.
pub(crate) fn storage_error(entity: &'static str) -> impl Fn(sqlx::Error) -> ServiceError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return ServiceError::AlreadyExists(entity.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return ServiceError::InUse(entity.to_string());
            }
        }
        tracing::error!(entity, error = %err, "query failed");
        ServiceError::Database(eyre::Report::new(err))
    }
}
