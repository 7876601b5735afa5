use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers::field_schedule as handler, middleware::auth, ApiState};

pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    let signed = Router::new()
        .route(
            "/field/schedule/update-status",
            patch(handler::update_field_schedule_status),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_service_signature,
        ));

    Router::new()
        .route(
            "/field/schedule/pagination",
            get(handler::list_field_schedules_paginated),
        )
        .route(
            "/field/schedule/lists/:uuid",
            get(handler::list_field_schedules_by_field_and_date),
        )
        .route(
            "/field/schedule/generate-one-month",
            post(handler::generate_field_schedule_for_one_month),
        )
        .route("/field/schedule/create", post(handler::create_field_schedule))
        .route(
            "/field/schedule/update/:uuid",
            put(handler::update_field_schedule),
        )
        .route(
            "/field/schedule/delete/:uuid",
            delete(handler::delete_field_schedule),
        )
        .route("/field/schedule/:uuid", get(handler::get_field_schedule))
        .merge(signed)
}
