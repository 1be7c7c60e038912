use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::middleware::{ApiError, ApiResult, AppState};
use crate::models::Service;

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub duration_minutes: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ServiceListResponse {
    pub services: Vec<Service>,
}

/// GET /api/services — the public catalog, active services only.
pub async fn list_active_services(
    State(state): State<AppState>,
) -> ApiResult<Json<ServiceListResponse>> {
    let services = state.db.list_services(true).await?;
    Ok(Json(ServiceListResponse { services }))
}

/// GET /api/admin/services — full catalog including deactivated.
pub async fn list_all_services(
    State(state): State<AppState>,
) -> ApiResult<Json<ServiceListResponse>> {
    let services = state.db.list_services(false).await?;
    Ok(Json(ServiceListResponse { services }))
}

/// POST /api/admin/services
pub async fn create_service(
    State(state): State<AppState>,
    Json(request): Json<CreateServiceRequest>,
) -> ApiResult<(StatusCode, Json<Service>)> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Service name is required".to_string()));
    }
    if request.price < 0.0 {
        return Err(ApiError::BadRequest(
            "Price must not be negative".to_string(),
        ));
    }
    if request.duration_minutes <= 0 {
        return Err(ApiError::BadRequest(
            "Duration must be greater than zero".to_string(),
        ));
    }

    let service = Service::new(
        name.to_string(),
        request.description,
        request.price,
        request.duration_minutes,
    );
    state.db.create_service(&service).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

/// PUT /api/admin/services/:id
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateServiceRequest>,
) -> ApiResult<Json<Service>> {
    if let Some(price) = request.price {
        if price < 0.0 {
            return Err(ApiError::BadRequest(
                "Price must not be negative".to_string(),
            ));
        }
    }
    if let Some(duration) = request.duration_minutes {
        if duration <= 0 {
            return Err(ApiError::BadRequest(
                "Duration must be greater than zero".to_string(),
            ));
        }
    }

    let service = state
        .db
        .update_service(
            &id,
            request.name.as_deref(),
            request.description.as_ref().map(|d| d.as_deref()),
            request.price,
            request.duration_minutes,
            request.active,
        )
        .await?;

    Ok(Json(service))
}

/// DELETE /api/admin/services/:id — soft deactivate.
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.db.deactivate_service(&id).await?;
    Ok(Json(json!({ "message": "Service deactivated" })))
}
