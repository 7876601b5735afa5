//! Domain services sitting between the handlers and the repositories.
//!
//! Each service owns `Arc<dyn ...>` collaborators so tests can swap in the
//! mockall doubles generated next to every repository trait.

pub mod field;
pub mod field_schedule;
pub mod time;
