use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::middleware::{ApiResult, AppState};
use crate::models::DayAvailability;

/// GET /api/availability/:date
pub async fn get_availability(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Json<DayAvailability>> {
    let availability = state.availability_service.available_slots(&date).await?;
    Ok(Json(availability))
}
