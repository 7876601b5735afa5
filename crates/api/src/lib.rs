//! # Fieldbook API
//!
//! The API crate provides the web server of the field booking service: the
//! time and field catalogs, the schedule engine that owns the booking calendar,
//! and the access gate that checks callers against the external user service.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure, all under `/api/v1`
//! - **Handlers**: Extract requests, run the access gate, wrap results in the envelope
//! - **Services**: Implement catalog and scheduling rules on top of the repositories
//! - **Middleware**: Authentication, error mapping, rate limiting
//! - **Clients / Storage**: The user service and the image blob store
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Outbound HTTP clients
pub mod clients;
/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication, rate limiting, and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Catalog and schedule services
pub mod services;
/// Blob storage for field images
pub mod storage;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::{eyre, Result};
use fieldbook_db::{
    repositories::{
        field::PgFieldRepository, field_schedule::PgFieldScheduleRepository,
        time::PgTimeRepository,
    },
    DbPool,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::{
    clients::user::HttpUserClient,
    config::ApiConfig,
    middleware::{auth::AccessGate, rate_limit},
    services::{field::FieldService, field_schedule::FieldScheduleService, time::TimeService},
    storage::blob::LocalBlobStore,
};

/// Shared application state that is accessible to all request handlers
///
/// Services hold their collaborators behind `Arc<dyn ...>` so the same state
/// can be assembled from mocks in tests.
pub struct ApiState {
    pub time_service: TimeService,
    pub field_service: FieldService,
    pub field_schedule_service: FieldScheduleService,
    pub access_gate: AccessGate,
    pub config: ApiConfig,
}

impl ApiState {
    /// Wires the Postgres repositories, the user service client and the local
    /// blob store together.
    pub fn new(config: ApiConfig, db_pool: DbPool) -> Result<Self> {
        let times = Arc::new(PgTimeRepository::new(db_pool.clone()));
        let fields = Arc::new(PgFieldRepository::new(db_pool.clone()));
        let schedules = Arc::new(PgFieldScheduleRepository::new(db_pool));

        let user_client = HttpUserClient::new(&config)
            .map_err(|err| eyre!("Failed to build user service client: {err}"))?;
        let blob_store = LocalBlobStore::from_config(&config.upload);

        Ok(Self {
            time_service: TimeService::new(times.clone()),
            field_service: FieldService::new(fields.clone(), Arc::new(blob_store)),
            field_schedule_service: FieldScheduleService::new(schedules, fields, times)
                .with_calendar_offset(config.calendar_offset),
            access_gate: AccessGate::new(Arc::new(user_client)),
            config,
        })
    }
}

/// Builds the application router with every route and the layers that do not
/// depend on the peer address.
///
/// The rate limiter is added by [`start_server`], since it keys on the
/// connection's peer IP.
pub fn build_router(state: Arc<ApiState>) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Time catalog endpoints
        .merge(routes::time::routes())
        // Field catalog endpoints
        .merge(routes::field::routes())
        // Schedule engine endpoints
        .merge(routes::field_schedule::routes(state.clone()));

    let app = Router::new()
        .nest("/api/v1", api)
        .nest_service("/uploads", ServeDir::new(&config.upload.dir))
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect::<Vec<_>>();

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                header::HeaderName::from_static("x-api-key"),
                header::HeaderName::from_static("x-service-name"),
                header::HeaderName::from_static("x-request-at"),
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(rate_limit::handle_panic))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    )
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, wires the application state, adds the
/// per-IP rate limiter and serves until the process is stopped.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = fieldbook_api::config::ApiConfig::from_env()?;
/// let db_pool = fieldbook_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// fieldbook_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let governor = GovernorConfigBuilder::default()
        .per_millisecond(rate_limit::replenish_interval_ms(&config.rate_limiter))
        .burst_size(config.rate_limiter.max_requests.max(1))
        .finish()
        .ok_or_else(|| eyre!("Invalid rate limiter configuration"))?;

    let addr = config.server_addr();
    let state = Arc::new(ApiState::new(config, db_pool)?);

    let app = build_router(state)
        .layer(GovernorLayer {
            config: Arc::new(governor),
        })
        .layer(axum::middleware::map_response(
            rate_limit::envelope_rate_limited,
        ));

    // Start the HTTP server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
