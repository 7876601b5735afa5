//! Per-client rate limiting and the responses produced outside of handlers.
//!
//! The governor layer and the panic catcher answer with plain-text bodies;
//! the functions here turn those into the usual JSON envelope.

use std::any::Any;

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::Response,
};
use fieldbook_core::errors::ServiceError;

use super::error_handling::map_error;
use crate::config::RateLimiterConfig;

/// Milliseconds between two refilled tokens when `max_requests` may be spent
/// every `time_seconds`.
pub fn replenish_interval_ms(config: &RateLimiterConfig) -> u64 {
    (config.time_seconds * 1000 / u64::from(config.max_requests.max(1))).max(1)
}

/// Rewrites the governor's plain 429 into the error envelope, keeping its
/// retry headers.
pub async fn envelope_rate_limited(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if response.status() != StatusCode::TOO_MANY_REQUESTS || is_json {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut enveloped = map_error(ServiceError::TooManyRequests);
    for (name, value) in parts.headers.iter() {
        if name != CONTENT_TYPE && name != axum::http::header::CONTENT_LENGTH {
            enveloped.headers_mut().insert(name.clone(), value.clone());
        }
    }
    enveloped
}

/// `CatchPanicLayer` handler: logs the payload and answers with a 500 envelope.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(%detail, "Recovered from panic");
    map_error(ServiceError::Internal(detail.into()))
}
