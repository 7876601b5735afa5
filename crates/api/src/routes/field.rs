use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use fieldbook_core::models::field::MAX_IMAGE_BYTES;
use std::sync::Arc;

use crate::{handlers, ApiState};

/// Body limit of the multipart field forms. Oversized single images are
/// rejected by the field service, not by the transport.
pub const MAX_FIELD_FORM_BYTES: usize = 16 * MAX_IMAGE_BYTES;

pub fn routes() -> Router<Arc<ApiState>> {
    let forms = Router::new()
        .route("/field/create", post(handlers::field::create_field))
        .route("/field/update/:uuid", put(handlers::field::update_field))
        .layer(DefaultBodyLimit::max(MAX_FIELD_FORM_BYTES));

    Router::new()
        .route("/field", get(handlers::field::list_fields))
        .route(
            "/field/pagination",
            get(handlers::field::list_fields_paginated),
        )
        .route("/field/:uuid", get(handlers::field::get_field))
        .route("/field/delete/:uuid", delete(handlers::field::delete_field))
        .merge(forms)
}
