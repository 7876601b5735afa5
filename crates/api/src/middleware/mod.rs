/// Role checks and signed service-to-service requests
pub mod auth;
/// Error to response mapping
pub mod error_handling;
/// Envelope rewriting for rate-limit and panic responses
pub mod rate_limit;
