use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiResult, AppState};
use crate::models::{
    format_time, format_working_days, parse_time, parse_working_days, weekday_from_name,
    ScheduleConfig,
};

/// Wire form of the schedule configuration: "HH:MM" strings and
/// lowercase day names.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleConfigPayload {
    pub opening_time: String,
    pub closing_time: String,
    pub break_start: String,
    pub break_end: String,
    pub slot_duration_minutes: u32,
    pub working_days: Vec<String>,
}

impl From<&ScheduleConfig> for ScheduleConfigPayload {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            opening_time: format_time(config.opening_time),
            closing_time: format_time(config.closing_time),
            break_start: format_time(config.break_start),
            break_end: format_time(config.break_end),
            slot_duration_minutes: config.slot_duration_minutes,
            working_days: format_working_days(&config.working_days)
                .split(',')
                .map(str::to_string)
                .collect(),
        }
    }
}

fn parse_payload_time(value: &str, field: &str) -> ApiResult<chrono::NaiveTime> {
    parse_time(value).ok_or_else(|| ApiError::BadRequest(format!("Invalid {}: {}", field, value)))
}

/// GET /api/admin/schedule-config — current config after legacy-key
/// resolution and default fallback.
pub async fn get_schedule_config(
    State(state): State<AppState>,
) -> ApiResult<Json<ScheduleConfigPayload>> {
    let config = state.db.load_schedule_config().await?;
    Ok(Json(ScheduleConfigPayload::from(&config)))
}

/// PUT /api/admin/schedule-config
pub async fn update_schedule_config(
    State(state): State<AppState>,
    Json(payload): Json<ScheduleConfigPayload>,
) -> ApiResult<Json<ScheduleConfigPayload>> {
    for day in &payload.working_days {
        if weekday_from_name(day).is_none() {
            return Err(ApiError::BadRequest(format!("Unknown weekday: {}", day)));
        }
    }

    let config = ScheduleConfig {
        opening_time: parse_payload_time(&payload.opening_time, "opening_time")?,
        closing_time: parse_payload_time(&payload.closing_time, "closing_time")?,
        break_start: parse_payload_time(&payload.break_start, "break_start")?,
        break_end: parse_payload_time(&payload.break_end, "break_end")?,
        slot_duration_minutes: payload.slot_duration_minutes,
        working_days: parse_working_days(&payload.working_days.join(",")),
    };

    config.validate().map_err(ApiError::BadRequest)?;
    state.db.save_schedule_config(&config).await?;

    Ok(Json(ScheduleConfigPayload::from(&config)))
}
