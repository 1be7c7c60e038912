use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiResult, AppState};
use crate::models::{AppointmentStatus, AppointmentWithService};

#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    pub date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<AppointmentWithService>,
    pub marked_late: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// GET /api/admin/appointments?date=&status=
///
/// Sweeps overdue scheduled appointments into `late` first, so the
/// listing reflects reality without a background worker.
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<ListAppointmentsQuery>,
) -> ApiResult<Json<AppointmentListResponse>> {
    let status = match query.status.as_deref() {
        Some(value) => Some(
            AppointmentStatus::parse(value)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown status: {}", value)))?,
        ),
        None => None,
    };

    let now = Local::now().naive_local();
    let marked_late = state
        .db
        .mark_overdue_as_late(
            &now.format("%Y-%m-%d").to_string(),
            &now.format("%H:%M").to_string(),
        )
        .await?;
    if marked_late > 0 {
        tracing::info!(marked_late, "marked overdue appointments as late");
    }

    let appointments = state
        .db
        .list_appointments(query.date.as_deref(), status)
        .await?;

    Ok(Json(AppointmentListResponse {
        appointments,
        marked_late,
    }))
}

/// PUT /api/admin/appointments/:id/status
///
/// Administrators can reschedule, complete or cancel; the other
/// statuses are set by the booking flow and the late sweep.
pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<crate::models::Appointment>> {
    let status = AppointmentStatus::parse(&request.status)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown status: {}", request.status)))?;

    let allowed = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];
    if !allowed.contains(&status) {
        return Err(ApiError::BadRequest(format!(
            "Status {} cannot be set manually",
            status
        )));
    }

    let appointment = state.db.update_appointment_status(&id, status).await?;
    Ok(Json(appointment))
}
