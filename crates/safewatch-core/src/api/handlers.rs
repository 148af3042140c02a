//! API handlers for the HTTP REST API

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::alerting::ChannelBroadcaster;
use crate::collector::{Pipeline, PipelineResult};
use crate::error::Error;
use crate::models::{Alert, ManualAlertInput, Reading, ReadingInput, SystemStatus};
use crate::query::QueryService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Write path: ingestion, manual alerts and clearing
    pub pipeline: Arc<Pipeline>,
    /// Read path over the state store
    pub queries: QueryService,
    /// In-process alert topic for WebSocket and SSE subscribers
    pub live: ChannelBroadcaster,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Outcome body for write endpoints
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    /// Outcome tag, e.g. `ALERT_GENERATED`
    pub status: &'static str,
    /// Human-readable summary
    pub message: String,
    /// Alert produced by the request, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
}

impl OutcomeResponse {
    fn new(status: &'static str, message: impl Into<String>, alert: Option<Alert>) -> Self {
        Self {
            status,
            message: message.into(),
            alert,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = OutcomeResponse::new("ERROR", self.to_string(), None);
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::validation(rejection.body_text())
    }
}

/// Ingest a single sensor reading
pub async fn ingest_reading(
    State(state): State<AppState>,
    payload: Result<Json<ReadingInput>, JsonRejection>,
) -> Result<Json<OutcomeResponse>, Error> {
    let Json(input) = payload?;
    let reading = input.validate()?;

    let body = match state.pipeline.ingest(reading).await? {
        PipelineResult::AlertGenerated(alert) => OutcomeResponse::new(
            "ALERT_GENERATED",
            "Safety alert generated and broadcasted",
            Some(alert),
        ),
        PipelineResult::NoAlert => OutcomeResponse::new(
            "DATA_PROCESSED",
            "Sensor data processed successfully - no alerts",
            None,
        ),
    };

    Ok(Json(body))
}

/// Inject an operator-supplied alert
pub async fn create_manual_alert(
    State(state): State<AppState>,
    payload: Result<Json<ManualAlertInput>, JsonRejection>,
) -> Result<Json<OutcomeResponse>, Error> {
    let Json(input) = payload?;
    let alert = state.pipeline.inject(input.validate()?).await?;

    Ok(Json(OutcomeResponse::new(
        "SUCCESS",
        "Manual alert created and broadcasted",
        Some(alert),
    )))
}

/// Clear the alert log
pub async fn clear_alerts(State(state): State<AppState>) -> Json<OutcomeResponse> {
    let cleared = state.pipeline.clear();
    Json(OutcomeResponse::new(
        "SUCCESS",
        format!("All alerts cleared ({cleared} removed)"),
        None,
    ))
}

/// List every alert, newest first
pub async fn list_alerts(State(state): State<AppState>) -> Json<Vec<Alert>> {
    Json(state.queries.all_alerts())
}

/// List one worker's alerts
pub async fn worker_alerts(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> Json<Vec<Alert>> {
    Json(state.queries.alerts_for_worker(&worker_id))
}

/// Latest reading for every worker
pub async fn latest_readings(State(state): State<AppState>) -> Json<HashMap<String, Reading>> {
    Json(state.queries.latest_readings())
}

/// One worker's reading history
pub async fn worker_history(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> Json<Vec<Reading>> {
    Json(state.queries.history_for_worker(&worker_id))
}

/// Aggregate system status
pub async fn system_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(state.queries.status())
}
