pub mod api; // HTTP + WebSocket control surface
pub mod config;
pub mod dashboard; // Orchestrating owner of items, sequencer and evaluator
pub mod pipeline;
pub mod pipeline_config;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError, ReasonerKind};
use crate::dashboard::Dashboard;
use crate::pipeline::reasoning::{OllamaClassifier, ReasoningError};

/// Timeout for the startup model listing.
const MODEL_CHECK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Reasoning backend error: {0}")]
    Reasoning(#[from] ReasoningError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn run() -> Result<(), RunError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = AppConfig::from_env()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve(app_config))
}

async fn serve(app_config: AppConfig) -> Result<(), RunError> {
    let classifier = app_config.build_classifier()?;
    if app_config.reasoner == ReasonerKind::Ollama {
        let client = OllamaClassifier::new(
            &app_config.ollama_url,
            &app_config.model,
            MODEL_CHECK_TIMEOUT_SECS,
        )?;
        client.check_model().await;
    }
    let dashboard = if app_config.demo_data {
        Dashboard::with_demo_data(app_config.timing.clone(), classifier)
    } else {
        Dashboard::new(app_config.timing.clone(), classifier)
    };

    let dashboard = Arc::new(dashboard);
    let mut server = api::start_server(Arc::clone(&dashboard), app_config.bind).await?;
    tracing::info!(addr = %server.session.server_addr, "Dashboard API listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }
    server.shutdown();
    server.stopped().await;

    // Keep the last results on disk.
    let has_results = dashboard
        .status()
        .map(|s| s.resolved_count > 0)
        .unwrap_or(false);
    if has_results {
        let path = config::exports_dir().join(pipeline::export::EXPORT_FILE_NAME);
        if let Err(e) = dashboard.export_to(&path) {
            tracing::warn!(error = %e, "Final export failed");
        }
    }
    Ok(())
}
