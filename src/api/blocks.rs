use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::middleware::{ApiError, ApiResult, AppState};
use crate::models::{format_time, parse_time, BlockedPeriod};
use crate::services::parse_date;

#[derive(Debug, Deserialize)]
pub struct CreateBlockedPeriodRequest {
    pub start_date: String,
    pub end_date: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ListBlockedPeriodsQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlockedPeriodListResponse {
    pub blocked_periods: Vec<BlockedPeriod>,
}

/// GET /api/admin/blocked-periods?date=
pub async fn list_blocked_periods(
    State(state): State<AppState>,
    Query(query): Query<ListBlockedPeriodsQuery>,
) -> ApiResult<Json<BlockedPeriodListResponse>> {
    let blocked_periods = state.db.list_blocked_periods(query.date.as_deref()).await?;
    Ok(Json(BlockedPeriodListResponse { blocked_periods }))
}

/// POST /api/admin/blocked-periods
pub async fn create_blocked_period(
    State(state): State<AppState>,
    Json(request): Json<CreateBlockedPeriodRequest>,
) -> ApiResult<(StatusCode, Json<BlockedPeriod>)> {
    let start_date = parse_date(&request.start_date)?;
    let end_date = match &request.end_date {
        Some(value) => {
            let end = parse_date(value)?;
            if end < start_date {
                return Err(ApiError::BadRequest(
                    "end_date must not be before start_date".to_string(),
                ));
            }
            Some(end)
        }
        None => None,
    };

    let start_time = parse_time(&request.start_time)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid time: {}", request.start_time)))?;
    let end_time = match &request.end_time {
        Some(value) => {
            let end = parse_time(value)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid time: {}", value)))?;
            if end <= start_time {
                return Err(ApiError::BadRequest(
                    "end_time must be after start_time".to_string(),
                ));
            }
            Some(end)
        }
        None => None,
    };

    if request.reason.trim().is_empty() {
        return Err(ApiError::BadRequest("Reason is required".to_string()));
    }

    // Store the parsed values in canonical form, not the client spelling
    let block = BlockedPeriod::new(
        start_date.format("%Y-%m-%d").to_string(),
        end_date.map(|end| end.format("%Y-%m-%d").to_string()),
        format_time(start_time),
        end_time.map(format_time),
        request.reason.trim().to_string(),
    );
    state.db.create_blocked_period(&block).await?;

    Ok((StatusCode::CREATED, Json(block)))
}

/// DELETE /api/admin/blocked-periods/:id — soft deactivate.
pub async fn delete_blocked_period(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.db.deactivate_blocked_period(&id).await?;
    Ok(Json(json!({ "message": "Blocked period removed" })))
}
