//! Clients for services this API calls over HTTP.

pub mod user;
