use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::Service;
use sqlx::any::AnyRow;
use sqlx::Row;

fn service_from_row(row: &AnyRow) -> ApiResult<Service> {
    Ok(Service {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        // Nullable column: the Any driver cannot decode SQL NULL into
        // Option directly
        description: row.try_get("description").ok(),
        price: row.try_get("price")?,
        duration_minutes: row.try_get("duration_minutes")?,
        active: row.try_get::<i32, _>("active")? != 0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_service(&self, service: &Service) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO services (id, name, description, price, duration_minutes, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration_minutes)
        .bind(service.active)
        .bind(&service.created_at)
        .bind(&service.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_service(&self, id: &str) -> ApiResult<Option<Service>> {
        let row = sqlx::query(
            "SELECT id, name, description, price, duration_minutes, active, created_at, updated_at
             FROM services WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(service_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch a service only if it exists and is still active; the
    /// booking validator treats anything else as an invalid service.
    pub async fn get_active_service(&self, id: &str) -> ApiResult<Option<Service>> {
        let row = sqlx::query(
            "SELECT id, name, description, price, duration_minutes, active, created_at, updated_at
             FROM services WHERE id = ? AND active = 1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(service_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_services(&self, active_only: bool) -> ApiResult<Vec<Service>> {
        let query = if active_only {
            "SELECT id, name, description, price, duration_minutes, active, created_at, updated_at
             FROM services WHERE active = 1 ORDER BY name ASC"
        } else {
            "SELECT id, name, description, price, duration_minutes, active, created_at, updated_at
             FROM services ORDER BY name ASC"
        };

        let rows = sqlx::query(query).fetch_all(self.pool()).await?;

        rows.iter().map(service_from_row).collect()
    }

    pub async fn update_service(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<Option<&str>>,
        price: Option<f64>,
        duration_minutes: Option<i64>,
        active: Option<bool>,
    ) -> ApiResult<Service> {
        let current = self
            .get_service(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Service {} not found", id)))?;

        let now = chrono::Utc::now().to_rfc3339();
        let updated_name = name.unwrap_or(&current.name);
        let updated_description = match description {
            Some(value) => value.map(|s| s.to_string()),
            None => current.description.clone(),
        };
        let updated_price = price.unwrap_or(current.price);
        let updated_duration = duration_minutes.unwrap_or(current.duration_minutes);
        let updated_active = active.unwrap_or(current.active);

        sqlx::query(
            "UPDATE services
             SET name = ?, description = ?, price = ?, duration_minutes = ?, active = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(updated_name)
        .bind(&updated_description)
        .bind(updated_price)
        .bind(updated_duration)
        .bind(updated_active)
        .bind(&now)
        .bind(id)
        .execute(self.pool())
        .await?;

        self.get_service(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Service {} not found", id)))
    }

    /// Soft delete: services referenced by appointments are never
    /// removed, only hidden from the catalog and the booking flow.
    pub async fn deactivate_service(&self, id: &str) -> ApiResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query("UPDATE services SET active = 0, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Service {} not found", id)));
        }

        Ok(())
    }
}
