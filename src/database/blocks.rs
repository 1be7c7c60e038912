use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::BlockedPeriod;
use sqlx::any::AnyRow;
use sqlx::Row;

fn block_from_row(row: &AnyRow) -> ApiResult<BlockedPeriod> {
    Ok(BlockedPeriod {
        id: row.try_get("id")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date").ok(),
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time").ok(),
        reason: row.try_get("reason")?,
        active: row.try_get::<i32, _>("active")? != 0,
        created_at: row.try_get("created_at")?,
    })
}

// A block covers `date` when start_date <= date <= end_date, or when it
// has no end_date and starts exactly on `date`. ISO "YYYY-MM-DD" text
// compares correctly as strings.
const DATE_OVERLAP: &str = "((end_date IS NULL AND start_date = ?)
     OR (end_date IS NOT NULL AND start_date <= ? AND end_date >= ?))";

impl Database {
    pub async fn create_blocked_period(&self, block: &BlockedPeriod) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO blocked_periods (id, start_date, end_date, start_time, end_time, reason, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&block.id)
        .bind(&block.start_date)
        .bind(&block.end_date)
        .bind(&block.start_time)
        .bind(&block.end_time)
        .bind(&block.reason)
        .bind(block.active)
        .bind(&block.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Active blocks overlapping one date, for the occupancy resolver.
    pub async fn get_active_blocks_for_date(&self, date: &str) -> ApiResult<Vec<BlockedPeriod>> {
        let query = format!(
            "SELECT * FROM blocked_periods
             WHERE active = 1 AND {}
             ORDER BY start_time ASC",
            DATE_OVERLAP
        );

        let rows = sqlx::query(&query)
            .bind(date)
            .bind(date)
            .bind(date)
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(block_from_row).collect()
    }

    /// Admin listing; `date` narrows to blocks overlapping that date.
    pub async fn list_blocked_periods(&self, date: Option<&str>) -> ApiResult<Vec<BlockedPeriod>> {
        let rows = match date {
            Some(date) => {
                let query = format!(
                    "SELECT * FROM blocked_periods
                     WHERE active = 1 AND {}
                     ORDER BY start_date ASC, start_time ASC",
                    DATE_OVERLAP
                );
                sqlx::query(&query)
                    .bind(date)
                    .bind(date)
                    .bind(date)
                    .fetch_all(self.pool())
                    .await?
            }
            None => {
                sqlx::query(
                    "SELECT * FROM blocked_periods
                     WHERE active = 1
                     ORDER BY start_date ASC, start_time ASC",
                )
                .fetch_all(self.pool())
                .await?
            }
        };

        rows.iter().map(block_from_row).collect()
    }

    /// Soft delete: the block stays on record but stops occupying slots.
    pub async fn deactivate_blocked_period(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("UPDATE blocked_periods SET active = 0 WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!(
                "Blocked period {} not found",
                id
            )));
        }

        Ok(())
    }
}
