use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/time", get(handlers::time::list_times))
        .route("/time/create", post(handlers::time::create_time))
        .route("/time/:uuid", get(handlers::time::get_time))
}
