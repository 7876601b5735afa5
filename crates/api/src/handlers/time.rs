use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::HeaderMap,
    Json,
};
use fieldbook_core::models::{
    response::ApiResponse,
    time::{CreateTimeRequest, TimeResponse},
    user::Role,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

pub async fn list_times(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<TimeResponse>>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;

    let times = state.time_service.list_all().await?;
    Ok(Json(ApiResponse::success(times)))
}

pub async fn get_time(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<TimeResponse>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let Path(uuid) = path?;

    let time = state.time_service.get_by_uuid(uuid).await?;
    Ok(Json(ApiResponse::success(time)))
}

pub async fn create_time(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateTimeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TimeResponse>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let Json(payload) = payload?;

    let time = state.time_service.create(payload).await?;
    Ok(Json(ApiResponse::success(time)))
}
