//! # Schedule Engine
//!
//! Owns the `(field, time, date)` slot calendar. Every insert path checks the
//! slots it is about to write before writing any of them, and the table's
//! unique constraint catches whatever slips past the check under concurrency.
//!
//! Status only ever moves forward: `Available` to `Booked`.

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Offset, Utc};
use fieldbook_core::{
    errors::{ServiceError, ServiceResult},
    format::{indonesian_short_date, rupiah, short_clock, time_range},
    models::field_schedule::{
        CreateFieldScheduleRequest, FieldScheduleByDateQuery, FieldScheduleForBookingResponse,
        FieldScheduleResponse, FieldScheduleStatus, GenerateFieldScheduleForOneMonthRequest,
        UpdateFieldScheduleRequest, UpdateStatusFieldScheduleRequest,
    },
    pagination::{paginate, PageRequest, Paginated, PaginationQuery},
};
use fieldbook_db::{
    models::{DbField, DbFieldScheduleDetail, DbTime, NewFieldScheduleRow},
    repositories::{
        field::FieldRepository,
        field_schedule::{FieldScheduleRepository, FIELD_SCHEDULE_SORT_COLUMNS},
        time::TimeRepository,
    },
};
use uuid::Uuid;

/// Length of the window filled by one-month generation.
pub const GENERATED_DAYS: u64 = 30;

/// Days between today and the first generated date.
const GENERATION_LEAD_DAYS: u64 = 2;

/// The dates one-month generation fills when run on `today`: thirty
/// consecutive days starting the day after tomorrow.
pub fn one_month_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..GENERATED_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(GENERATION_LEAD_DAYS + offset)))
        .collect()
}

/// The calendar date at `now` for a deployment running at `offset` from UTC.
pub fn calendar_today(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

fn schedule_not_found() -> ServiceError {
    ServiceError::NotFound("Field schedule".to_string())
}

fn slot_taken() -> ServiceError {
    ServiceError::AlreadyExists("Field schedule".to_string())
}

/// Admin view of a schedule; `date` is ISO formatted.
fn detail_response(schedule: DbFieldScheduleDetail) -> ServiceResult<FieldScheduleResponse> {
    Ok(FieldScheduleResponse {
        uuid: schedule.uuid,
        status: schedule.status()?,
        date: schedule.date.format("%Y-%m-%d").to_string(),
        time: time_range(&schedule.start_time, &schedule.end_time),
        field_name: schedule.field_name,
        price_per_hour: schedule.price_per_hour,
        created_at: schedule.created_at,
        updated_at: schedule.updated_at,
    })
}

/// Paginated list item; `date` uses the Indonesian short form.
fn list_item_response(schedule: DbFieldScheduleDetail) -> ServiceResult<FieldScheduleResponse> {
    let date = indonesian_short_date(schedule.date);
    Ok(FieldScheduleResponse {
        date,
        ..detail_response(schedule)?
    })
}

fn booking_response(schedule: DbFieldScheduleDetail) -> ServiceResult<FieldScheduleForBookingResponse> {
    Ok(FieldScheduleForBookingResponse {
        uuid: schedule.uuid,
        status: schedule.status()?,
        price_per_hour: rupiah(i64::from(schedule.price_per_hour)),
        date: indonesian_short_date(schedule.date),
        time: short_clock(&schedule.start_time),
    })
}

#[derive(Clone)]
pub struct FieldScheduleService {
    schedules: Arc<dyn FieldScheduleRepository>,
    fields: Arc<dyn FieldRepository>,
    times: Arc<dyn TimeRepository>,
    calendar_offset: FixedOffset,
}

impl FieldScheduleService {
    pub fn new(
        schedules: Arc<dyn FieldScheduleRepository>,
        fields: Arc<dyn FieldRepository>,
        times: Arc<dyn TimeRepository>,
    ) -> Self {
        Self {
            schedules,
            fields,
            times,
            calendar_offset: Utc.fix(),
        }
    }

    /// Sets the UTC offset whose calendar day one-month generation counts from.
    pub fn with_calendar_offset(mut self, offset: FixedOffset) -> Self {
        self.calendar_offset = offset;
        self
    }

    pub async fn list_paginated(
        &self,
        query: &PaginationQuery,
    ) -> ServiceResult<Paginated<FieldScheduleResponse>> {
        let page = PageRequest::from_query(query, FIELD_SCHEDULE_SORT_COLUMNS)?;
        let (schedules, total) = self.schedules.find_all_paginated(&page).await?;

        let items = schedules
            .into_iter()
            .map(list_item_response)
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(paginate(items, total, page.page, page.limit))
    }

    /// Booking view of one field's schedules on one date.
    pub async fn list_by_field_and_date(
        &self,
        field_uuid: Uuid,
        query: &FieldScheduleByDateQuery,
    ) -> ServiceResult<Vec<FieldScheduleForBookingResponse>> {
        let date = query.validate()?;
        let field = self.find_field(field_uuid).await?;

        self.schedules
            .find_all_by_field_id_and_date(field.id, date)
            .await?
            .into_iter()
            .map(booking_response)
            .collect()
    }

    pub async fn get_by_uuid(&self, uuid: Uuid) -> ServiceResult<FieldScheduleResponse> {
        let schedule = self.find_schedule(uuid).await?;
        detail_response(schedule)
    }

    /// Opens one `Available` slot per requested time on the given date.
    ///
    /// Every time is resolved and every slot checked before the single
    /// transactional insert; one occupied slot rejects the whole request.
    pub async fn create(&self, request: CreateFieldScheduleRequest) -> ServiceResult<()> {
        let request = request.validate()?;
        let field = self.find_field(request.field_id).await?;

        let mut seen = HashSet::new();
        let mut rows = Vec::with_capacity(request.time_ids.len());
        for time_uuid in request.time_ids {
            let time = self.find_time(time_uuid).await?;
            if !seen.insert(time.id) {
                return Err(slot_taken());
            }
            self.ensure_slot_free(field.id, time.id, request.date).await?;
            rows.push(NewFieldScheduleRow::available(field.id, time.id, request.date));
        }

        let inserted = self.schedules.create_many(rows).await?;
        tracing::info!(field = %field.uuid, date = %request.date, inserted, "Created field schedules");
        Ok(())
    }

    /// Fills the next month of a field's calendar with every known time slot.
    pub async fn generate_for_one_month(
        &self,
        request: GenerateFieldScheduleForOneMonthRequest,
    ) -> ServiceResult<()> {
        let field_uuid = request.validate()?;
        let today = calendar_today(Utc::now(), self.calendar_offset);
        self.generate_for_one_month_from(field_uuid, today)
            .await
    }

    /// [`generate_for_one_month`](Self::generate_for_one_month) with an explicit
    /// current date.
    pub async fn generate_for_one_month_from(
        &self,
        field_uuid: Uuid,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        let field = self.find_field(field_uuid).await?;
        let times = self.times.find_all().await?;

        let window = one_month_window(today);
        let mut rows = Vec::with_capacity(window.len() * times.len());
        for date in window {
            for time in &times {
                self.ensure_slot_free(field.id, time.id, date).await?;
                rows.push(NewFieldScheduleRow::available(field.id, time.id, date));
            }
        }

        if rows.is_empty() {
            tracing::warn!(field = %field.uuid, "No time slots defined, nothing generated");
            return Ok(());
        }

        let inserted = self.schedules.create_many(rows).await?;
        tracing::info!(field = %field.uuid, %today, inserted, "Generated one month of field schedules");
        Ok(())
    }

    /// Moves a schedule to another date and/or time slot of the same field.
    pub async fn update(
        &self,
        uuid: Uuid,
        request: UpdateFieldScheduleRequest,
    ) -> ServiceResult<FieldScheduleResponse> {
        let (date, time_uuid) = request.validate()?;
        let schedule = self.find_schedule(uuid).await?;
        let time = self.find_time(time_uuid).await?;

        let occupant = self
            .schedules
            .find_by_date_and_time_id(date, time.id, schedule.field_id)
            .await?;
        if occupant.is_some_and(|occupant| occupant.uuid != uuid) {
            return Err(slot_taken());
        }

        let updated = self
            .schedules
            .update(uuid, date, time.id)
            .await?
            .ok_or_else(schedule_not_found)?;

        tracing::info!(%uuid, %date, time = %time.uuid, "Updated field schedule");
        detail_response(updated)
    }

    /// Marks every given schedule `Booked`. Unknown ids abort the whole
    /// request before anything is written.
    pub async fn update_status(&self, request: UpdateStatusFieldScheduleRequest) -> ServiceResult<()> {
        let requested = request.validate()?;

        let mut seen = HashSet::new();
        let uuids: Vec<Uuid> = requested
            .into_iter()
            .filter(|uuid| seen.insert(*uuid))
            .collect();

        for uuid in &uuids {
            self.find_schedule(*uuid).await?;
        }

        let updated = self
            .schedules
            .update_status(uuids, FieldScheduleStatus::Booked)
            .await?;
        tracing::info!(updated, "Booked field schedules");
        Ok(())
    }

    pub async fn delete(&self, uuid: Uuid) -> ServiceResult<()> {
        self.find_schedule(uuid).await?;

        if self.schedules.delete(uuid).await? == 0 {
            return Err(schedule_not_found());
        }
        tracing::info!(%uuid, "Deleted field schedule");
        Ok(())
    }

    async fn ensure_slot_free(&self, field_id: i32, time_id: i32, date: NaiveDate) -> ServiceResult<()> {
        match self
            .schedules
            .find_by_date_and_time_id(date, time_id, field_id)
            .await?
        {
            Some(_) => Err(slot_taken()),
            None => Ok(()),
        }
    }

    async fn find_schedule(&self, uuid: Uuid) -> ServiceResult<DbFieldScheduleDetail> {
        self.schedules
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(schedule_not_found)
    }

    async fn find_field(&self, uuid: Uuid) -> ServiceResult<DbField> {
        self.fields
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Field".to_string()))
    }

    async fn find_time(&self, uuid: Uuid) -> ServiceResult<DbTime> {
        self.times
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Time".to_string()))
    }
}
