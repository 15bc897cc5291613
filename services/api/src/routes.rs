//! API service routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{middleware::require_admin, state::AppState};

pub mod admin;
pub mod public;

/// Create the router for the API service
pub fn create_router(state: AppState, upload_limit_bytes: usize) -> Router {
    let admin_routes = Router::new()
        .route("/admin/session", get(admin::session))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/activity", get(admin::activity))
        .route(
            "/admin/calendar",
            get(admin::calendar_month).put(admin::save_calendar_day),
        )
        .route(
            "/admin/videos",
            get(admin::list_videos).post(admin::upload_videos),
        )
        .route(
            "/admin/videos/:id",
            patch(admin::rename_video).delete(admin::delete_video),
        )
        .route("/admin/bookings", get(admin::list_bookings))
        .route(
            "/admin/bookings/:id",
            patch(admin::update_booking).delete(admin::delete_booking),
        )
        .route("/admin/contact-forms", get(admin::list_contact_forms))
        .route("/admin/contact-forms/:id", patch(admin::update_contact_form))
        .route("/admin/callbacks", get(admin::list_callbacks))
        .route("/admin/callbacks/:id", delete(admin::delete_callback))
        .route("/admin/callbacks/:id/advance", post(admin::advance_callback))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/home", get(public::home))
        .route("/api/portfolio", get(public::portfolio))
        .route("/api/calendar", get(public::calendar))
        .route("/api/booking", get(public::booking))
        .route("/api/contact", post(public::submit_contact))
        .route("/api/callbacks", post(public::request_callback))
        .route("/api/bookings", post(public::request_booking))
        .route("/admin/login", post(admin::login))
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(upload_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "wedding-films-api"
    }))
}
