//! Dashboard API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! JSON routes are nested under `/api/`, the event stream lives at
//! `/ws/events`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::api::websocket;
use crate::dashboard::Dashboard;

/// Build the dashboard router.
pub fn dashboard_router(dashboard: Arc<Dashboard>) -> Router {
    let ctx = ApiContext::new(dashboard);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/status", get(endpoints::pipeline::status))
        .route("/pipeline/start", post(endpoints::pipeline::start))
        .route("/pipeline/reset", post(endpoints::pipeline::reset))
        .route("/items", get(endpoints::items::list))
        .route("/items/upload", post(endpoints::items::upload))
        .route("/train/upload", post(endpoints::items::upload_train))
        .route(
            "/novels",
            get(endpoints::items::novels).post(endpoints::items::add_novels),
        )
        .route("/stats", get(endpoints::items::stats))
        .route("/export", get(endpoints::export::download))
        .with_state(ctx.clone());

    let ws_routes = Router::new()
        .route("/ws/events", get(websocket::events_upgrade))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .merge(ws_routes)
        .fallback(|| async { ApiError::NotFound("No such route".into()) })
        // The dashboard front end is served from another origin.
        .layer(CorsLayer::permissive())
}
