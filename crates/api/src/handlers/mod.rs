/// Field catalog endpoints
pub mod field;
/// Schedule engine endpoints
pub mod field_schedule;
/// Time catalog endpoints
pub mod time;
