//! # Authentication Module
//!
//! Two mechanisms guard the API:
//!
//! - [`AccessGate`] resolves the caller's bearer token through the user
//!   service and checks the returned role against the roles a route allows.
//! - Signed requests: a calling service sends `x-service-name`,
//!   `x-request-at` and `x-api-key = sha256_hex("{service}:{key}:{requestAt}")`.
//!   [`api_key`] produces the digest for outbound calls and
//!   [`require_service_signature`] checks it on inbound ones.
//!
//! Every failure is reported as `401 unauthorized`; the gate never answers
//! with 403.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use fieldbook_core::{
    errors::{ServiceError, ServiceResult},
    models::user::{Role, UserData},
};
use sha2::{Digest, Sha256};

use super::error_handling::AppError;
use crate::{
    clients::user::{UserClient, API_KEY_HEADER, REQUEST_AT_HEADER, SERVICE_NAME_HEADER},
    ApiState,
};

/// Hex SHA-256 of `"{service_name}:{signature_key}:{request_at}"`.
///
/// # Example
///
/// ```
/// use fieldbook_api::middleware::auth::api_key;
///
/// let key = api_key("field-service", "secret", "1700000000");
/// assert_eq!(key.len(), 64);
/// ```
pub fn api_key(service_name: &str, signature_key: &str, request_at: &str) -> String {
    let digest = Sha256::digest(format!("{service_name}:{signature_key}:{request_at}").as_bytes());
    format!("{digest:x}")
}

/// Checks the signed-request headers against our own signature key.
pub fn verify_api_key(headers: &HeaderMap, signature_key: &str) -> ServiceResult<()> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let (Some(presented), Some(service_name), Some(request_at)) = (
        header(API_KEY_HEADER),
        header(SERVICE_NAME_HEADER),
        header(REQUEST_AT_HEADER),
    ) else {
        return Err(ServiceError::Unauthorized(
            "missing signed request headers".to_string(),
        ));
    };

    if presented.eq_ignore_ascii_case(&api_key(service_name, signature_key, request_at)) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized(format!(
            "bad api key from service {service_name}"
        )))
    }
}

/// Route middleware rejecting unsigned calls when
/// `ENFORCE_SERVICE_SIGNATURE` is on. A no-op otherwise.
pub async fn require_service_signature(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.config.enforce_service_signature {
        verify_api_key(request.headers(), &state.config.signature_key)?;
    }
    Ok(next.run(request).await)
}

/// Role check backed by the user service. Nothing is cached: every guarded
/// request costs one user-service call.
#[derive(Clone)]
pub struct AccessGate {
    user_client: Arc<dyn UserClient>,
}

impl AccessGate {
    pub fn new(user_client: Arc<dyn UserClient>) -> Self {
        Self { user_client }
    }

    /// Resolves the caller and checks their role is one of `roles`.
    ///
    /// # Errors
    ///
    /// `ServiceError::Unauthorized` when the `Authorization` header is missing,
    /// the user service cannot be reached or rejects the token, or the role
    /// does not match.
    pub async fn require(&self, headers: &HeaderMap, roles: &[Role]) -> ServiceResult<UserData> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("missing Authorization header".to_string()))?;

        let user = self.user_client.get_user_by_token(token).await.map_err(|err| match err {
            ServiceError::Unauthorized(reason) => ServiceError::Unauthorized(reason),
            other => ServiceError::Unauthorized(other.to_string()),
        })?;

        if !user.has_any_role(roles) {
            return Err(ServiceError::Unauthorized(format!(
                "user {} has role {:?}",
                user.uuid, user.role
            )));
        }

        Ok(user)
    }
}
