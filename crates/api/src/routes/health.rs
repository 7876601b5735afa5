use axum::{routing::get, Json, Router};
use fieldbook_core::models::response::ApiResponse;
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
pub struct VersionResponse {
    version: String,
}

async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
    }))
}

async fn version() -> Json<ApiResponse<VersionResponse>> {
    Json(ApiResponse::success(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
