/// Field catalog routes
pub mod field;
/// Schedule engine routes
pub mod field_schedule;
/// Liveness and version routes
pub mod health;
/// Time catalog routes
pub mod time;
