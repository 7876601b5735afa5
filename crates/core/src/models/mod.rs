pub mod field;
pub mod field_schedule;
pub mod response;
pub mod time;
pub mod user;
