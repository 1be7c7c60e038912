use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::{
    format_time, format_working_days, parse_time, parse_working_days, ScheduleConfig,
};
use sqlx::Row;
use std::collections::HashMap;

// Priority-ordered accepted keys per schedule field. Earlier deployments
// wrote the legacy names; resolution stays at this boundary so the slot
// engine only ever sees a parsed ScheduleConfig.
const OPENING_TIME_KEYS: [&str; 2] = ["opening_time", "open_hour"];
const CLOSING_TIME_KEYS: [&str; 2] = ["closing_time", "close_hour"];
const BREAK_START_KEYS: [&str; 2] = ["break_start", "lunch_start"];
const BREAK_END_KEYS: [&str; 2] = ["break_end", "lunch_end"];
const SLOT_DURATION_KEYS: [&str; 2] = ["slot_duration_minutes", "slot_minutes"];
const WORKING_DAYS_KEYS: [&str; 2] = ["working_days", "open_days"];

impl Database {
    /// Get a setting value by key.
    pub async fn get_setting(&self, key: &str) -> ApiResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        if let Some(row) = row {
            Ok(Some(row.try_get("value")?))
        } else {
            Ok(None)
        }
    }

    /// Upsert a setting value.
    pub async fn set_setting(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> ApiResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO settings (key, value, description, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 description = COALESCE(excluded.description, description),
                 updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Load the schedule configuration, resolving legacy key names and
    /// falling back to defaults for anything missing or unparsable.
    ///
    /// Missing configuration never fails the booking flow; it degrades
    /// to the documented defaults instead.
    pub async fn load_schedule_config(&self) -> ApiResult<ScheduleConfig> {
        let rows = sqlx::query("SELECT key, value FROM settings")
            .fetch_all(self.pool())
            .await?;

        let mut values = HashMap::new();
        for row in rows {
            let key: String = row.try_get("key")?;
            let value: String = row.try_get("value")?;
            values.insert(key, value);
        }

        let defaults = ScheduleConfig::default();

        let opening_time = resolve(&values, &OPENING_TIME_KEYS)
            .and_then(parse_time)
            .unwrap_or(defaults.opening_time);
        let closing_time = resolve(&values, &CLOSING_TIME_KEYS)
            .and_then(parse_time)
            .unwrap_or(defaults.closing_time);
        let break_start = resolve(&values, &BREAK_START_KEYS)
            .and_then(parse_time)
            .unwrap_or(defaults.break_start);
        let break_end = resolve(&values, &BREAK_END_KEYS)
            .and_then(parse_time)
            .unwrap_or(defaults.break_end);
        let slot_duration_minutes = resolve(&values, &SLOT_DURATION_KEYS)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|minutes| *minutes > 0)
            .unwrap_or(defaults.slot_duration_minutes);
        let working_days = resolve(&values, &WORKING_DAYS_KEYS)
            .map(|value| parse_working_days(value))
            .filter(|days| !days.is_empty())
            .unwrap_or(defaults.working_days);

        Ok(ScheduleConfig {
            opening_time,
            closing_time,
            break_start,
            break_end,
            slot_duration_minutes,
            working_days,
        })
    }

    /// Persist the schedule configuration under the canonical key names.
    pub async fn save_schedule_config(&self, config: &ScheduleConfig) -> ApiResult<()> {
        self.set_setting("opening_time", &format_time(config.opening_time), None)
            .await?;
        self.set_setting("closing_time", &format_time(config.closing_time), None)
            .await?;
        self.set_setting("break_start", &format_time(config.break_start), None)
            .await?;
        self.set_setting("break_end", &format_time(config.break_end), None)
            .await?;
        self.set_setting(
            "slot_duration_minutes",
            &config.slot_duration_minutes.to_string(),
            None,
        )
        .await?;
        self.set_setting(
            "working_days",
            &format_working_days(&config.working_days),
            None,
        )
        .await?;

        Ok(())
    }
}

fn resolve<'a>(values: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| values.get(*key).map(String::as_str))
}
