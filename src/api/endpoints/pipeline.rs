//! Pipeline control endpoints: status, start, reset.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ControlResponse};
use crate::dashboard::DashboardStatus;

/// `GET /api/status`: current stage, board and progress.
pub async fn status(State(ctx): State<ApiContext>) -> Result<Json<DashboardStatus>, ApiError> {
    Ok(Json(ctx.dashboard.status()?))
}

/// `POST /api/pipeline/start`: claim the run slot, then run in the background.
///
/// Rejections (no items, run in flight) are reported synchronously.
pub async fn start(
    State(ctx): State<ApiContext>,
) -> Result<(StatusCode, Json<ControlResponse>), ApiError> {
    let claim = ctx.dashboard.begin_run()?;
    let dashboard = Arc::clone(&ctx.dashboard);

    tokio::spawn(async move {
        if let Ok(summary) = dashboard.execute(claim).await {
            tracing::info!(
                items = summary.item_count,
                failures = summary.failures,
                duration_ms = summary.duration_ms,
                "Pipeline run finished"
            );
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ControlResponse { status: "started" }),
    ))
}

/// `POST /api/pipeline/reset`: abandon any run and return to idle.
pub async fn reset(State(ctx): State<ApiContext>) -> Result<Json<ControlResponse>, ApiError> {
    ctx.dashboard.reset()?;
    Ok(Json(ControlResponse { status: "reset" }))
}
