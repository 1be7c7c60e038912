use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{Appointment, AppointmentStatus};
use crate::services::availability_service::{parse_date, AvailabilityService};
use crate::services::slots::{span_slots, AppointmentSpan};
use chrono::{Datelike, Duration, Local, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Requests timestamped up to this many minutes before "now" are still
/// accepted, absorbing clock skew and in-flight submissions near the
/// boundary.
pub const BOOKING_GRACE_MINUTES: i64 = 15;

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub client_name: String,
    pub phone: String,
    pub date: String,
    pub time_slot: String,
    pub service_id: String,
    pub notes: Option<String>,
}

/// Structured, user-correctable rejection reasons. These are returned
/// to the caller as data, never surfaced as opaque failures.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingRejection {
    #[error("time slot is already booked")]
    SlotConflict { client_name: Option<String> },
    #[error("time slot is blocked: {reason}")]
    SlotBlocked { reason: String },
    #[error("service not found or inactive")]
    InvalidService,
    #[error("cannot book a time in the past")]
    PastDate,
    #[error("closed on this day")]
    ClosedDay,
}

#[derive(Debug)]
pub enum BookingOutcome {
    Accepted(Appointment),
    Rejected(BookingRejection),
}

#[derive(Clone)]
pub struct BookingService {
    db: Database,
    availability: AvailabilityService,
}

impl BookingService {
    pub fn new(db: Database, availability: AvailabilityService) -> Self {
        Self { db, availability }
    }

    pub async fn create_booking(&self, request: BookingRequest) -> ApiResult<BookingOutcome> {
        self.create_booking_at(request, Local::now().naive_local())
            .await
    }

    /// Validate and create a booking against an explicit clock.
    ///
    /// Checks run in order (conflict, block, service, temporal) and
    /// each failure is a distinct rejection. The checks and the insert
    /// are not one transaction; the partial unique index on
    /// (date, time_slot) closes the remaining race window, so a lost
    /// race comes back as SlotConflict rather than a duplicate row.
    pub async fn create_booking_at(
        &self,
        request: BookingRequest,
        now: NaiveDateTime,
    ) -> ApiResult<BookingOutcome> {
        let date = parse_date(&request.date)?;
        let time = crate::models::parse_time(&request.time_slot).ok_or_else(|| {
            ApiError::BadRequest(format!("Invalid time: {}", request.time_slot))
        })?;

        // Canonical storage forms. Lenient input like "2025-6-2" or
        // "9:00" parses fine but must never reach the database as-is,
        // or two spellings of one slot would both satisfy the unique
        // index.
        let date_key = date.format("%Y-%m-%d").to_string();
        let slot_key = crate::models::format_time(time);

        let config = self.db.load_schedule_config().await?;

        if !config.working_days.contains(&date.weekday()) {
            return Ok(BookingOutcome::Rejected(BookingRejection::ClosedDay));
        }

        let grid = self.availability.day_grid(&date_key, &config).await?;

        if !grid.base_slots.contains(&time) {
            return Err(ApiError::BadRequest(format!(
                "{} is not a bookable slot on {}",
                request.time_slot, request.date
            )));
        }

        // 1. Conflict: the requested slot itself.
        if grid.occupied_by_appointments.contains(&time) {
            let client_name = self
                .conflicting_client(&date_key, time, config.slot_duration_minutes)
                .await?;
            return Ok(BookingOutcome::Rejected(BookingRejection::SlotConflict {
                client_name,
            }));
        }

        // 2. Administrative block.
        if let Some(reason) = grid.block_covering(time) {
            return Ok(BookingOutcome::Rejected(BookingRejection::SlotBlocked {
                reason: reason.to_string(),
            }));
        }

        // 3. Service must exist and be active.
        let Some(service) = self.db.get_active_service(&request.service_id).await? else {
            return Ok(BookingOutcome::Rejected(BookingRejection::InvalidService));
        };

        // 4. Temporal: reject at and before now minus the grace margin.
        let requested = NaiveDateTime::new(date, time);
        if requested <= now - Duration::minutes(BOOKING_GRACE_MINUTES) {
            return Ok(BookingOutcome::Rejected(BookingRejection::PastDate));
        }

        // 5. The full span of the requested service must be free, the
        // same duration-aware rule the listing engine applies. Span
        // slots past closing are ignored, mirroring the occupancy
        // clamp.
        let duration = u32::try_from(service.duration_minutes.max(1))
            .map_err(|_| ApiError::Internal("Service duration out of range".to_string()))?;
        let span = AppointmentSpan {
            start: time,
            duration_minutes: duration,
        };
        for slot in span_slots(span, config.slot_duration_minutes) {
            if !grid.base_slots.contains(&slot) {
                continue;
            }
            if grid.occupied_by_appointments.contains(&slot) {
                let client_name = self
                    .conflicting_client(&date_key, slot, config.slot_duration_minutes)
                    .await?;
                return Ok(BookingOutcome::Rejected(BookingRejection::SlotConflict {
                    client_name,
                }));
            }
            if let Some(reason) = grid.block_covering(slot) {
                return Ok(BookingOutcome::Rejected(BookingRejection::SlotBlocked {
                    reason: reason.to_string(),
                }));
            }
        }

        let appointment = Appointment::new(
            request.client_name.trim().to_string(),
            request.phone.trim().to_string(),
            date_key.clone(),
            slot_key.clone(),
            request.service_id.clone(),
            request.notes.clone(),
            AppointmentStatus::Scheduled,
        );

        match self.db.insert_appointment(&appointment).await {
            Ok(()) => {
                tracing::info!(
                    appointment_id = %appointment.id,
                    date = %appointment.date,
                    time_slot = %appointment.time_slot,
                    "booking accepted"
                );
                Ok(BookingOutcome::Accepted(appointment))
            }
            // Lost the race: another request inserted into this slot
            // between our read and our write.
            Err(ApiError::Conflict(_)) => {
                tracing::info!(
                    date = %date_key,
                    time_slot = %slot_key,
                    "booking lost insert race"
                );
                let client_name = self
                    .db
                    .get_active_appointment_at(&date_key, &slot_key)
                    .await?
                    .map(|existing| existing.client_name);
                Ok(BookingOutcome::Rejected(BookingRejection::SlotConflict {
                    client_name,
                }))
            }
            Err(err) => Err(err),
        }
    }

    /// Name the client whose appointment covers the given slot, for
    /// the conflict message. The covering appointment may start at an
    /// earlier slot when durations span the grid.
    async fn conflicting_client(
        &self,
        date: &str,
        slot: NaiveTime,
        slot_duration_minutes: u32,
    ) -> ApiResult<Option<String>> {
        let appointments = self
            .db
            .get_appointments_for_date(date, &AppointmentStatus::SLOT_HOLDING)
            .await?;

        for row in &appointments {
            let Some(start) = crate::models::parse_time(&row.appointment.time_slot) else {
                continue;
            };
            // Missing joined duration falls back to one slot, the same
            // default the occupancy resolver applies.
            let duration = row
                .service_duration_minutes
                .and_then(|minutes| u32::try_from(minutes).ok())
                .unwrap_or(slot_duration_minutes);
            let span = AppointmentSpan {
                start,
                duration_minutes: duration,
            };
            if span_slots(span, slot_duration_minutes).contains(&slot) {
                return Ok(Some(row.appointment.client_name.clone()));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_serialize_with_kind_tag_and_fields() {
        let blocked = BookingRejection::SlotBlocked {
            reason: "Staff meeting".to_string(),
        };
        let value = serde_json::to_value(&blocked).expect("serializable");
        assert_eq!(value["kind"], "slot_blocked");
        assert_eq!(value["reason"], "Staff meeting");

        let conflict = BookingRejection::SlotConflict {
            client_name: Some("Alice".to_string()),
        };
        let value = serde_json::to_value(&conflict).expect("serializable");
        assert_eq!(value["kind"], "slot_conflict");
        assert_eq!(value["client_name"], "Alice");

        let closed = serde_json::to_value(BookingRejection::ClosedDay).expect("serializable");
        assert_eq!(closed["kind"], "closed_day");
    }
}
