use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{
    format_time, parse_time, AppointmentStatus, DayAvailability, ScheduleConfig,
};
use crate::services::slots::{generate_slots, resolve_occupied, AppointmentSpan, BlockSpan};

use chrono::{Datelike, NaiveDate, NaiveTime};
use std::collections::HashSet;

/// Base grid and occupied subset for one date under one config
/// snapshot. Shared between the availability listing and the booking
/// validator so both apply identical occupancy rules.
#[derive(Debug, Clone)]
pub struct DayGrid {
    pub base_slots: Vec<NaiveTime>,
    pub occupied_by_appointments: HashSet<NaiveTime>,
    pub blocks: Vec<(BlockSpan, String)>,
}

impl DayGrid {
    pub fn block_covering(&self, slot: NaiveTime) -> Option<&str> {
        self.blocks
            .iter()
            .find(|(span, _)| span.covers(slot))
            .map(|(_, reason)| reason.as_str())
    }
}

#[derive(Clone)]
pub struct AvailabilityService {
    db: Database,
}

impl AvailabilityService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Compute the bookable slots for a date. Read-only and
    /// idempotent; every call re-reads configuration, appointments and
    /// blocks so new state is immediately visible.
    pub async fn available_slots(&self, date: &str) -> ApiResult<DayAvailability> {
        let date_value = parse_date(date)?;
        // Query and report in canonical "YYYY-MM-DD" form even when the
        // input parsed leniently
        let date_key = date_value.format("%Y-%m-%d").to_string();
        let config = self.db.load_schedule_config().await?;

        if !config.working_days.contains(&date_value.weekday()) {
            tracing::debug!(date = %date_key, "closed on this weekday");
            return Ok(DayAvailability {
                date: date_key,
                slots: Vec::new(),
                closed: true,
                message: Some("Closed on this day".to_string()),
            });
        }

        let grid = self.day_grid(&date_key, &config).await?;

        let slots = grid
            .base_slots
            .iter()
            .filter(|slot| {
                !grid.occupied_by_appointments.contains(slot)
                    && grid.block_covering(**slot).is_none()
            })
            .map(|slot| format_time(*slot))
            .collect();

        Ok(DayAvailability {
            date: date_key,
            slots,
            closed: false,
            message: None,
        })
    }

    /// Build the day's base grid plus occupancy inputs for one date.
    ///
    /// Rows with malformed stored times are skipped with a warning
    /// rather than failing the whole computation.
    pub async fn day_grid(&self, date: &str, config: &ScheduleConfig) -> ApiResult<DayGrid> {
        let base_slots = generate_slots(config);

        let appointments = self
            .db
            .get_appointments_for_date(date, &AppointmentStatus::SLOT_HOLDING)
            .await?;

        let mut spans = Vec::with_capacity(appointments.len());
        for row in &appointments {
            let Some(start) = parse_time(&row.appointment.time_slot) else {
                tracing::warn!(
                    appointment_id = %row.appointment.id,
                    time_slot = %row.appointment.time_slot,
                    "skipping appointment with malformed time slot"
                );
                continue;
            };
            let duration = row
                .service_duration_minutes
                .and_then(|minutes| u32::try_from(minutes).ok())
                .unwrap_or(config.slot_duration_minutes);
            spans.push(AppointmentSpan {
                start,
                duration_minutes: duration,
            });
        }

        let block_rows = self.db.get_active_blocks_for_date(date).await?;
        let mut blocks = Vec::with_capacity(block_rows.len());
        for row in &block_rows {
            let Some(start) = parse_time(&row.start_time) else {
                tracing::warn!(
                    block_id = %row.id,
                    start_time = %row.start_time,
                    "skipping blocked period with malformed start time"
                );
                continue;
            };
            let end = row.end_time.as_deref().and_then(parse_time);
            blocks.push((BlockSpan { start, end }, row.reason.clone()));
        }

        // Appointment occupancy is kept separate from block coverage
        // so the booking validator can report distinct rejection
        // reasons; the listing treats their union as occupied.
        let occupied_by_appointments =
            resolve_occupied(&base_slots, &spans, &[], config.slot_duration_minutes);

        Ok(DayGrid {
            base_slots,
            occupied_by_appointments,
            blocks,
        })
    }
}

pub fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date: {}", value)))
}
