use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::HeaderMap,
    Json,
};
use fieldbook_core::{
    errors::{FieldViolation, ServiceError, ServiceResult},
    models::{
        field::{FieldRequest, FieldResponse, UploadedImage},
        response::ApiResponse,
        user::Role,
    },
    pagination::{Paginated, PaginationQuery},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

fn form_error(err: MultipartError) -> ServiceError {
    ServiceError::invalid("body", err.body_text())
}

/// Reads the `multipart/form-data` body of field create and update.
///
/// Text parts: `code`, `name`, `pricePerHour`. File parts named `images`
/// (or `images[]`) become uploaded images; the list stays `None` when the
/// form carries no such part.
pub async fn read_field_form(mut multipart: Multipart) -> ServiceResult<FieldRequest> {
    let mut request = FieldRequest::default();
    let mut violations = Vec::new();

    while let Some(part) = multipart.next_field().await.map_err(form_error)? {
        let name = part.name().unwrap_or_default().to_string();
        match name.as_str() {
            "code" => request.code = part.text().await.map_err(form_error)?,
            "name" => request.name = part.text().await.map_err(form_error)?,
            "pricePerHour" => {
                let raw = part.text().await.map_err(form_error)?;
                match raw.trim().parse() {
                    Ok(price) => request.price_per_hour = price,
                    Err(_) => violations.push(FieldViolation::new(
                        "pricePerHour",
                        "must be a whole number",
                    )),
                }
            }
            "images" | "images[]" => {
                let file_name = part.file_name().unwrap_or("image").to_string();
                let bytes = part.bytes().await.map_err(form_error)?;
                request
                    .images
                    .get_or_insert_with(Vec::new)
                    .push(UploadedImage {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
            }
            other => tracing::debug!(part = other, "Ignoring unknown form part"),
        }
    }

    if violations.is_empty() {
        Ok(request)
    } else {
        Err(ServiceError::Validation(violations))
    }
}

pub async fn list_fields(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ApiResponse<Vec<FieldResponse>>>, AppError> {
    let fields = state.field_service.list_all().await?;
    Ok(Json(ApiResponse::success(fields)))
}

pub async fn list_fields_paginated(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Paginated<FieldResponse>>>, AppError> {
    state
        .access_gate
        .require(&headers, &[Role::Admin, Role::Customer])
        .await?;
    let Query(query) = query?;

    let page = state.field_service.list_paginated(&query).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_field(
    State(state): State<Arc<ApiState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<FieldResponse>>, AppError> {
    let Path(uuid) = path?;

    let field = state.field_service.get_by_uuid(uuid).await?;
    Ok(Json(ApiResponse::success(field)))
}

pub async fn create_field(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<FieldResponse>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let request = read_field_form(multipart?).await?;

    let field = state.field_service.create(request).await?;
    Ok(Json(ApiResponse::success(field)))
}

pub async fn update_field(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<FieldResponse>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let Path(uuid) = path?;
    let request = read_field_form(multipart?).await?;

    let field = state.field_service.update(uuid, request).await?;
    Ok(Json(ApiResponse::success(field)))
}

pub async fn delete_field(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.access_gate.require(&headers, &[Role::Admin]).await?;
    let Path(uuid) = path?;

    state.field_service.delete(uuid).await?;
    Ok(Json(ApiResponse::ok()))
}
