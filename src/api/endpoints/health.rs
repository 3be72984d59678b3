//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub classifier: String,
    /// Whether the pipeline backend connection is established.
    pub connected: bool,
}

/// `GET /api/health`: liveness plus which classifier is configured.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        classifier: ctx.dashboard.classifier_name().to_string(),
        connected: ctx.dashboard.sequencer().is_ready(),
    }))
}
