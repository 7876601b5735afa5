use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use fieldbook_core::{
    errors::{ServiceError, ServiceResult},
    models::user::{UserData, UserResponse},
};
use mockall::automock;
use reqwest::{header::AUTHORIZATION, Client};

use crate::{config::ApiConfig, middleware::auth::api_key};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const SERVICE_NAME_HEADER: &str = "x-service-name";
pub const REQUEST_AT_HEADER: &str = "x-request-at";

/// Resolves a bearer token to the user it belongs to.
#[automock]
#[async_trait]
pub trait UserClient: Send + Sync {
    /// `token` is the caller's `Authorization` header value, forwarded as is.
    async fn get_user_by_token(&self, token: &str) -> ServiceResult<UserData>;
}

/// [`UserClient`] backed by the user service's `GET /api/v1/auth/user`.
#[derive(Debug, Clone)]
pub struct HttpUserClient {
    client: Client,
    base_url: String,
    app_name: String,
    signature_key: String,
}

impl HttpUserClient {
    pub fn new(config: &ApiConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.user_service.timeout_seconds))
            .build()
            .map_err(|err| ServiceError::Internal(Box::new(err)))?;

        Ok(Self {
            client,
            base_url: config.user_service.base_url.clone(),
            app_name: config.app_name.clone(),
            signature_key: config.user_service.signature_key.clone(),
        })
    }

    fn user_url(&self) -> String {
        format!("{}/api/v1/auth/user", self.base_url)
    }
}

#[async_trait]
impl UserClient for HttpUserClient {
    async fn get_user_by_token(&self, token: &str) -> ServiceResult<UserData> {
        let request_at = Utc::now().timestamp();

        let response = self
            .client
            .get(self.user_url())
            .header(AUTHORIZATION, token)
            .header(
                API_KEY_HEADER,
                api_key(&self.app_name, &self.signature_key, &request_at.to_string()),
            )
            .header(SERVICE_NAME_HEADER, &self.app_name)
            .header(REQUEST_AT_HEADER, request_at.to_string())
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "User service request failed");
                ServiceError::Unauthorized(format!("user service unreachable: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<UserResponse>().await.ok();
            let message = body.map(|body| body.message).unwrap_or_default();
            tracing::debug!(%status, %message, "User service rejected token");
            return Err(ServiceError::Unauthorized(format!(
                "user response {status}: {message}"
            )));
        }

        let body = response.json::<UserResponse>().await.map_err(|err| {
            ServiceError::Unauthorized(format!("malformed user response: {err}"))
        })?;

        body.data
            .ok_or_else(|| ServiceError::Unauthorized("user response carried no data".to_string()))
    }
}
