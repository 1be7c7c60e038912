use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{Appointment, AppointmentStatus, AppointmentWithService};
use sqlx::any::AnyRow;
use sqlx::Row;

fn appointment_from_row(row: &AnyRow) -> ApiResult<Appointment> {
    let status: String = row.try_get("status")?;
    let status = AppointmentStatus::parse(&status)
        .ok_or_else(|| ApiError::Internal(format!("Unknown appointment status: {}", status)))?;

    Ok(Appointment {
        id: row.try_get("id")?,
        client_name: row.try_get("client_name")?,
        phone: row.try_get("phone")?,
        date: row.try_get("date")?,
        time_slot: row.try_get("time_slot")?,
        service_id: row.try_get("service_id")?,
        notes: row.try_get("notes").ok(),
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn appointment_with_service_from_row(row: &AnyRow) -> ApiResult<AppointmentWithService> {
    // The LEFT JOIN leaves these NULL when the service row is gone
    Ok(AppointmentWithService {
        appointment: appointment_from_row(row)?,
        service_name: row.try_get("service_name").ok(),
        service_price: row.try_get("service_price").ok(),
        service_duration_minutes: row.try_get("service_duration_minutes").ok(),
    })
}

fn status_placeholders(statuses: &[AppointmentStatus]) -> String {
    statuses.iter().map(|_| "?").collect::<Vec<_>>().join(", ")
}

impl Database {
    /// Insert a new appointment.
    ///
    /// The partial unique index on (date, time_slot) over slot-holding
    /// statuses makes this the serialization point for concurrent
    /// bookings: the loser of a race gets a Conflict instead of a
    /// double-booked row.
    pub async fn insert_appointment(&self, appointment: &Appointment) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO appointments (id, client_name, phone, date, time_slot, service_id, notes, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&appointment.id)
        .bind(&appointment.client_name)
        .bind(&appointment.phone)
        .bind(&appointment.date)
        .bind(&appointment.time_slot)
        .bind(&appointment.service_id)
        .bind(&appointment.notes)
        .bind(appointment.status.as_str())
        .bind(&appointment.created_at)
        .bind(&appointment.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_appointment(&self, id: &str) -> ApiResult<Option<Appointment>> {
        let row = sqlx::query("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(appointment_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Appointments for one date in the given statuses, joined with
    /// the service fields the occupancy resolver needs.
    pub async fn get_appointments_for_date(
        &self,
        date: &str,
        statuses: &[AppointmentStatus],
    ) -> ApiResult<Vec<AppointmentWithService>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT a.*, s.name AS service_name, s.price AS service_price,
                    s.duration_minutes AS service_duration_minutes
             FROM appointments a
             LEFT JOIN services s ON a.service_id = s.id
             WHERE a.date = ? AND a.status IN ({})
             ORDER BY a.time_slot ASC",
            status_placeholders(statuses)
        );

        let mut q = sqlx::query(&query).bind(date);
        for status in statuses {
            q = q.bind(status.as_str());
        }

        let rows = q.fetch_all(self.pool()).await?;
        rows.iter().map(appointment_with_service_from_row).collect()
    }

    /// The active appointment holding (date, time_slot), if any. Used
    /// to name the conflicting client in a rejection.
    pub async fn get_active_appointment_at(
        &self,
        date: &str,
        time_slot: &str,
    ) -> ApiResult<Option<Appointment>> {
        let row = sqlx::query(
            "SELECT * FROM appointments
             WHERE date = ? AND time_slot = ? AND status IN ('scheduled', 'confirmed')",
        )
        .bind(date)
        .bind(time_slot)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(appointment_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Admin listing with optional date and status filters.
    pub async fn list_appointments(
        &self,
        date: Option<&str>,
        status: Option<AppointmentStatus>,
    ) -> ApiResult<Vec<AppointmentWithService>> {
        let mut query = String::from(
            "SELECT a.*, s.name AS service_name, s.price AS service_price,
                    s.duration_minutes AS service_duration_minutes
             FROM appointments a
             LEFT JOIN services s ON a.service_id = s.id
             WHERE 1 = 1",
        );

        if date.is_some() {
            query.push_str(" AND a.date = ?");
        }
        if status.is_some() {
            query.push_str(" AND a.status = ?");
        }
        query.push_str(" ORDER BY a.date ASC, a.time_slot ASC");

        let mut q = sqlx::query(&query);
        if let Some(date) = date {
            q = q.bind(date);
        }
        if let Some(status) = status {
            q = q.bind(status.as_str());
        }

        let rows = q.fetch_all(self.pool()).await?;
        rows.iter().map(appointment_with_service_from_row).collect()
    }

    pub async fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> ApiResult<Appointment> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query("UPDATE appointments SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(&now)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Appointment {} not found", id)));
        }

        self.get_appointment(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Appointment {} not found", id)))
    }

    /// Mark scheduled appointments whose (date, time) already passed as
    /// late. Run lazily before admin listings, mirroring a background
    /// reconciliation sweep.
    pub async fn mark_overdue_as_late(&self, today: &str, now_time: &str) -> ApiResult<u64> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE appointments
             SET status = 'late', updated_at = ?
             WHERE status = 'scheduled'
               AND (date < ? OR (date = ? AND time_slot < ?))",
        )
        .bind(&now)
        .bind(today)
        .bind(today)
        .bind(now_time)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }
}
