//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the field booking
//! API server. It retrieves configuration values from environment variables and
//! provides defaults where appropriate. The resulting [`ApiConfig`] is built once
//! at start-up and handed to every component that needs it.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 8002)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `APP_NAME`: Service name sent as `x-service-name` (default: "field-service")
//! - `SIGNATURE_KEY`: Shared secret for inbound signed requests (required)
//! - `ENFORCE_SERVICE_SIGNATURE`: Require signed requests on the status update route
//! - `USER_SERVICE_URL`: Base URL of the user service (required)
//! - `USER_SERVICE_SIGNATURE_KEY`: Shared secret for calls to the user service (required)
//! - `USER_SERVICE_TIMEOUT_SECONDS`: Timeout of the role lookup (default: 10)
//! - `RATE_LIMITER_MAX_REQUESTS`: Burst size per client IP (default: 100)
//! - `RATE_LIMITER_TIME_SECONDS`: Seconds to replenish the burst (default: 60)
//! - `UPLOAD_DIR`: Directory field images are written to (default: "uploads")
//! - `UPLOAD_PUBLIC_URL`: Public URL prefix of `UPLOAD_DIR` (default: "http://localhost:8002/uploads")
//! - `CALENDAR_UTC_OFFSET_HOURS`: Whole-hour UTC offset of the calendar schedules are generated on (default: 7, WIB)

use chrono::FixedOffset;
use eyre::{eyre, Result, WrapErr};
use std::env;
use tracing::Level;

/// Connection details for the external user service.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub base_url: String,
    pub signature_key: String,
    pub timeout_seconds: u64,
}

/// Token-bucket settings applied per client IP.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    pub max_requests: u32,
    pub time_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub public_url: String,
}

/// Configuration for the field booking API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use fieldbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    pub database_max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Name this service identifies itself with on outbound calls
    pub app_name: String,

    /// Secret shared with services that call us with signed requests
    pub signature_key: String,

    pub enforce_service_signature: bool,

    pub user_service: UserServiceConfig,

    pub rate_limiter: RateLimiterConfig,

    pub upload: UploadConfig,

    /// Offset from UTC whose calendar day schedule generation starts from
    pub calendar_offset: FixedOffset,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `DATABASE_URL`, `SIGNATURE_KEY`, `USER_SERVICE_URL` or
    ///   `USER_SERVICE_SIGNATURE_KEY` is not set
    /// - a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "8002".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Service identity
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "field-service".to_string());
        let signature_key = env::var("SIGNATURE_KEY")
            .wrap_err("SIGNATURE_KEY environment variable must be set")?;
        let enforce_service_signature = env::var("ENFORCE_SERVICE_SIGNATURE")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        // User service
        let user_service = UserServiceConfig {
            base_url: env::var("USER_SERVICE_URL")
                .wrap_err("USER_SERVICE_URL environment variable must be set")?
                .trim_end_matches('/')
                .to_string(),
            signature_key: env::var("USER_SERVICE_SIGNATURE_KEY")
                .wrap_err("USER_SERVICE_SIGNATURE_KEY environment variable must be set")?,
            timeout_seconds: env::var("USER_SERVICE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .wrap_err("Invalid USER_SERVICE_TIMEOUT_SECONDS value")?,
        };

        // Rate limiting
        let rate_limiter = RateLimiterConfig {
            max_requests: env::var("RATE_LIMITER_MAX_REQUESTS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .wrap_err("Invalid RATE_LIMITER_MAX_REQUESTS value")?,
            time_seconds: env::var("RATE_LIMITER_TIME_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .wrap_err("Invalid RATE_LIMITER_TIME_SECONDS value")?,
        };

        // Image uploads
        let upload = UploadConfig {
            dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            public_url: env::var("UPLOAD_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8002/uploads".to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        // Calendar
        let calendar_offset = parse_utc_offset(
            &env::var("CALENDAR_UTC_OFFSET_HOURS").unwrap_or_else(|_| "7".to_string()),
        )?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            app_name,
            signature_key,
            enforce_service_signature,
            user_service,
            rate_limiter,
            upload,
            calendar_offset,
        })
    }

    /// Returns the server address as a string
    ///
    /// # Returns
    ///
    /// * `String` - Formatted server address (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_log_level(raw: &str) -> Level {
    match raw {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let hours: i32 = raw
        .trim()
        .parse()
        .wrap_err("Invalid CALENDAR_UTC_OFFSET_HOURS value")?;
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| eyre!("CALENDAR_UTC_OFFSET_HOURS out of range: {hours}"))
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
