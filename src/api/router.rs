use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::api::middleware::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Public booking surface
        .route(
            "/api/availability/:date",
            get(api::availability::get_availability),
        )
        .route("/api/bookings", post(api::bookings::create_booking))
        .route("/api/services", get(api::services::list_active_services))
        // Admin surface (authentication is handled upstream of this
        // service and intentionally not modelled here)
        .route(
            "/api/admin/appointments",
            get(api::appointments::list_appointments),
        )
        .route(
            "/api/admin/appointments/:id/status",
            put(api::appointments::update_appointment_status),
        )
        .route("/api/admin/services", get(api::services::list_all_services))
        .route("/api/admin/services", post(api::services::create_service))
        .route(
            "/api/admin/services/:id",
            put(api::services::update_service),
        )
        .route(
            "/api/admin/services/:id",
            delete(api::services::delete_service),
        )
        .route(
            "/api/admin/blocked-periods",
            get(api::blocks::list_blocked_periods),
        )
        .route(
            "/api/admin/blocked-periods",
            post(api::blocks::create_blocked_period),
        )
        .route(
            "/api/admin/blocked-periods/:id",
            delete(api::blocks::delete_blocked_period),
        )
        .route(
            "/api/admin/schedule-config",
            get(api::settings::get_schedule_config),
        )
        .route(
            "/api/admin/schedule-config",
            put(api::settings::update_schedule_config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
