use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::middleware::{ApiError, ApiResult, AppState};
use crate::models::Appointment;
use crate::services::{BookingOutcome, BookingRejection, BookingRequest};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub client_name: String,
    pub phone: String,
    pub date: String,
    pub time_slot: String,
    pub service_id: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub client_name: String,
    pub phone: String,
    pub date: String,
    pub time_slot: String,
    pub service_id: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            client_name: appointment.client_name,
            phone: appointment.phone,
            date: appointment.date,
            time_slot: appointment.time_slot,
            service_id: appointment.service_id,
            notes: appointment.notes,
            status: appointment.status.to_string(),
            created_at: appointment.created_at,
        }
    }
}

fn validate(request: &CreateBookingRequest) -> Result<(), ApiError> {
    let name = request.client_name.trim();
    if name.len() < 2 || name.len() > 100 {
        return Err(ApiError::BadRequest(
            "Client name must be between 2 and 100 characters".to_string(),
        ));
    }

    let digits = request.phone.chars().filter(char::is_ascii_digit).count();
    if digits < 8 {
        return Err(ApiError::BadRequest(
            "Phone number must contain at least 8 digits".to_string(),
        ));
    }

    Ok(())
}

/// POST /api/bookings
///
/// 201 on acceptance; rejections come back as structured JSON with a
/// machine-readable `kind`, 409 for slot conflicts and 400 for the
/// rest.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> ApiResult<Response> {
    validate(&request)?;

    let outcome = state
        .booking_service
        .create_booking(BookingRequest {
            client_name: request.client_name,
            phone: request.phone,
            date: request.date,
            time_slot: request.time_slot,
            service_id: request.service_id,
            notes: request.notes,
        })
        .await?;

    match outcome {
        BookingOutcome::Accepted(appointment) => Ok((
            StatusCode::CREATED,
            Json(AppointmentResponse::from(appointment)),
        )
            .into_response()),
        BookingOutcome::Rejected(rejection) => {
            let status = match rejection {
                BookingRejection::SlotConflict { .. } => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            };
            let mut body = json!({ "error": rejection.to_string() });
            if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(&rejection) {
                if let Some(object) = body.as_object_mut() {
                    object.extend(fields);
                }
            }
            Ok((status, Json(body)).into_response())
        }
    }
}
