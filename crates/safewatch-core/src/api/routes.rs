//! API routes

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{self, AppState};
use super::live;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))

        // Reading ingestion and queries
        .route("/api/sensor-data", post(handlers::ingest_reading))
        .route("/api/sensor-data/latest", get(handlers::latest_readings))
        .route("/api/sensor-data/worker/:worker_id", get(handlers::worker_history))

        // Alerts
        .route("/api/alerts", get(handlers::list_alerts))
        .route("/api/alerts/worker/:worker_id", get(handlers::worker_alerts))
        .route("/api/alerts/manual", post(handlers::create_manual_alert))
        .route("/api/alerts/clear", delete(handlers::clear_alerts))

        // Status
        .route("/api/status", get(handlers::system_status))

        // Real-time streaming
        .route("/api/alerts/stream", get(live::stream_alerts))
        .route("/ws/alerts", get(live::ws_alerts))

        .with_state(state)
}
