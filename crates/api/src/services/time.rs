use std::sync::Arc;

use fieldbook_core::{
    errors::{ServiceError, ServiceResult},
    format::parse_clock_time,
    models::time::{CreateTimeRequest, TimeResponse},
};
use fieldbook_db::repositories::time::TimeRepository;
use uuid::Uuid;

/// Catalog of the bookable time slots.
#[derive(Clone)]
pub struct TimeService {
    repository: Arc<dyn TimeRepository>,
}

impl TimeService {
    pub fn new(repository: Arc<dyn TimeRepository>) -> Self {
        Self { repository }
    }

    /// All time slots ordered by start time.
    pub async fn list_all(&self) -> ServiceResult<Vec<TimeResponse>> {
        let times = self.repository.find_all().await?;
        Ok(times.into_iter().map(TimeResponse::from).collect())
    }

    pub async fn get_by_uuid(&self, uuid: Uuid) -> ServiceResult<TimeResponse> {
        self.repository
            .find_by_uuid(uuid)
            .await?
            .map(TimeResponse::from)
            .ok_or_else(|| ServiceError::NotFound("Time".to_string()))
    }

    pub async fn get_by_id(&self, id: i32) -> ServiceResult<TimeResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(TimeResponse::from)
            .ok_or_else(|| ServiceError::NotFound("Time".to_string()))
    }

    /// Stores a new slot. Both times are normalised to `HH:MM:SS`.
    pub async fn create(&self, request: CreateTimeRequest) -> ServiceResult<TimeResponse> {
        request.validate()?;

        let start_time = normalize_clock(&request.start_time)?;
        let end_time = normalize_clock(&request.end_time)?;

        let time = self.repository.create(&start_time, &end_time).await?;
        tracing::info!(uuid = %time.uuid, %start_time, %end_time, "Created time slot");
        Ok(time.into())
    }
}

fn normalize_clock(raw: &str) -> ServiceResult<String> {
    parse_clock_time(raw)
        .map(|time| time.format("%H:%M:%S").to_string())
        .ok_or_else(|| ServiceError::invalid("time", format!("{raw:?} is not a clock time")))
}
