//! HTTP API for caregiver alerts.
//!
//! ## Endpoints
//!
//! - `POST /alerts/` - Submit an alert; returns urgency context and advice
//! - `GET /alerts/` - List recent alerts (`patient_id`, `limit` query params)
//! - `GET /health` - Liveness check

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use dto::{CreateAlertRequest, CreateAlertResponse, ListAlertsQuery};
pub use error::ApiError;
pub use state::AppState;

/// Build the API router.
///
/// Alert routes answer with and without the trailing slash.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/alerts/",
            post(handlers::create_alert).get(handlers::list_alerts),
        )
        .route(
            "/alerts",
            post(handlers::create_alert).get(handlers::list_alerts),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
