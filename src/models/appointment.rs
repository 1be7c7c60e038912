use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub client_name: String,
    pub phone: String,
    /// Calendar date in "YYYY-MM-DD" form.
    pub date: String,
    /// Slot start in "HH:MM" form.
    pub time_slot: String,
    pub service_id: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Appointment {
    pub fn new(
        client_name: String,
        phone: String,
        date: String,
        time_slot: String,
        service_id: String,
        notes: Option<String>,
        status: AppointmentStatus,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_name,
            phone,
            date,
            time_slot,
            service_id,
            notes,
            status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Appointments are never deleted; they only move between statuses.
/// Only `Scheduled` and `Confirmed` hold a slot against new bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    PendingPayment,
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Late,
}

impl AppointmentStatus {
    /// Statuses that occupy their (date, time_slot) for availability.
    pub const SLOT_HOLDING: [AppointmentStatus; 2] =
        [AppointmentStatus::Scheduled, AppointmentStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::PendingPayment => "pending_payment",
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Late => "late",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending_payment" => Some(AppointmentStatus::PendingPayment),
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            "late" => Some(AppointmentStatus::Late),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Appointment joined with the service fields the engine and the admin
/// listing need (duration for occupancy, name/price for display).
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentWithService {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub service_name: Option<String>,
    pub service_price: Option<f64>,
    pub service_duration_minutes: Option<i64>,
}
