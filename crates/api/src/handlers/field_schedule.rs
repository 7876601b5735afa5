use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    Json,
};
use fieldbook_core::{
    models::{
        field_schedule::{
            CreateFieldScheduleRequest, FieldScheduleByDateQuery,
            FieldScheduleForBookingResponse, FieldScheduleResponse,
            GenerateFieldScheduleForOneMonthRequest, UpdateFieldScheduleRequest,
            UpdateStatusFieldScheduleRequest,
        },
        response::ApiResponse,
        user::Role,
    },
    pagination::{Paginated, PaginationQuery},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

pub async fn list_field_schedules_paginated(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Paginated<FieldScheduleResponse>>>, AppError> {
    state
        .access_gate
        .require(&headers, &[Role::Admin, Role::Customer])
        .await?;
    let Query(query) = query?;

    let page = state.field_schedule_service.list_paginated(&query).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Booking view of one field's calendar, open to everyone.
pub async fn list_field_schedules_by_field_and_date(
    State(state): State<Arc<ApiState>>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<FieldScheduleByDateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<FieldScheduleForBookingResponse>>>, AppError> {
    let Path(field_uuid) = path?;
    let Query(query) = query?;

    let schedules = state
        .field_schedule_service
        .list_by_field_and_date(field_uuid, &query)
        .await?;
    Ok(Json(ApiResponse::success(schedules)))
}

pub async fn get_field_schedule(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<FieldScheduleResponse>>, AppError> {
    state
        .access_gate
        .require(&headers, &[Role::Admin, Role::Customer])
        .await?;
    let Path(uuid) = path?;

    let schedule = state.field_schedule_service.get_by_uuid(uuid).await?;
    Ok(Json(ApiResponse::success(schedule)))
}

pub async fn create_field_schedule(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateFieldScheduleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let Json(payload) = payload?;

    state.field_schedule_service.create(payload).await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn generate_field_schedule_for_one_month(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    payload: Result<Json<GenerateFieldScheduleForOneMonthRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let Json(payload) = payload?;

    state
        .field_schedule_service
        .generate_for_one_month(payload)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn update_field_schedule(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateFieldScheduleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FieldScheduleResponse>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let Path(uuid) = path?;
    let Json(payload) = payload?;

    let schedule = state.field_schedule_service.update(uuid, payload).await?;
    Ok(Json(ApiResponse::success(schedule)))
}

/// Called by the payment flow once a booking is paid. Signed-request checks
/// are applied by route middleware.
pub async fn update_field_schedule_status(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<UpdateStatusFieldScheduleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Json(payload) = payload?;

    state.field_schedule_service.update_status(payload).await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn delete_field_schedule(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let Path(uuid) = path?;

    state.field_schedule_service.delete(uuid).await?;
    Ok(Json(ApiResponse::ok()))
}
