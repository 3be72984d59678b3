//! Shared types for the dashboard API layer.

use std::sync::Arc;

use serde::Serialize;

use crate::dashboard::{Dashboard, DashboardStatus};
use crate::pipeline::types::PipelineEvent;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub dashboard: Arc<Dashboard>,
}

impl ApiContext {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        Self { dashboard }
    }
}

/// Messages pushed over the event WebSocket.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WsOutgoing {
    /// First message of every connection.
    Welcome(WsWelcome),
    Event(PipelineEvent),
}

#[derive(Debug, Serialize)]
pub struct WsWelcome {
    /// Always `"Welcome"`, mirroring the `type` tag of pipeline events.
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub session_id: String,
    pub status: DashboardStatus,
}

/// Count returned by the upload endpoints.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub count: usize,
}

/// Acknowledgement for control endpoints.
#[derive(Debug, Serialize)]
pub struct ControlResponse {
    pub status: &'static str,
}
