//! # Fieldbook Core
//!
//! Domain types shared by the database and API crates: request/response
//! models, the service error taxonomy, pagination and display formatting.

pub mod errors;
pub mod format;
pub mod models;
pub mod pagination;
