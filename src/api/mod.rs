//! Dashboard HTTP API.
//!
//! Exposes the pipeline control surface as JSON endpoints under `/api/`
//! and streams pipeline events over a WebSocket at `/ws/events`.
//!
//! The router is composable: `dashboard_router()` returns a `Router` that
//! can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;
pub mod websocket;

pub use router::dashboard_router;
pub use server::{start_server, ApiServer, ApiSession};
pub use types::ApiContext;
