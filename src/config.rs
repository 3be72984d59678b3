use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::reasoning::ollama::{DEFAULT_OLLAMA_URL, DEFAULT_REASONING_MODEL};
use crate::pipeline::reasoning::{
    ConsistencyClassifier, OllamaClassifier, ReasoningError, StubClassifier,
    UnavailableClassifier,
};
use crate::pipeline_config::{PipelineTiming, TimingPreset};

/// Application-level constants
pub const APP_NAME: &str = "Backstory";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// Per-request timeout for the reasoning backend, in seconds.
pub const DEFAULT_REASONING_TIMEOUT_SECS: u64 = 300;

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "backstory_lib=debug,tower_http=debug,info"
    } else {
        "backstory_lib=info,warn"
    }
}

/// Get the application data directory
/// ~/Backstory/, falling back to the working directory without a home.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the exports directory
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

// ═══════════════════════════════════════════
// Runtime configuration
// ═══════════════════════════════════════════

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Which classifier backs the reasoning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonerKind {
    Ollama,
    Stub,
    Unavailable,
}

impl ReasonerKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "stub" => Some(Self::Stub),
            "unavailable" | "none" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub reasoner: ReasonerKind,
    pub ollama_url: String,
    pub model: String,
    pub timing: PipelineTiming,
    pub demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            reasoner: ReasonerKind::Unavailable,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_REASONING_MODEL.to_string(),
            timing: PipelineTiming::demo(),
            demo_data: true,
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}

impl AppConfig {
    /// Read `BACKSTORY_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup("BACKSTORY_BIND") {
            config.bind = bind.parse().map_err(|_| ConfigError::InvalidValue {
                var: "BACKSTORY_BIND",
                value: bind.clone(),
            })?;
        }
        if let Some(reasoner) = lookup("BACKSTORY_REASONER") {
            config.reasoner =
                ReasonerKind::from_str(&reasoner).ok_or(ConfigError::InvalidValue {
                    var: "BACKSTORY_REASONER",
                    value: reasoner.clone(),
                })?;
        }
        if let Some(url) = lookup("BACKSTORY_OLLAMA_URL") {
            config.ollama_url = url;
        }
        if let Some(model) = lookup("BACKSTORY_MODEL") {
            config.model = model;
        }
        if let Some(timing) = lookup("BACKSTORY_TIMING") {
            let preset = TimingPreset::from_str(&timing).ok_or(ConfigError::InvalidValue {
                var: "BACKSTORY_TIMING",
                value: timing.clone(),
            })?;
            config.timing = PipelineTiming::from_preset(preset);
        }
        if let Some(demo) = lookup("BACKSTORY_DEMO_DATA") {
            config.demo_data = parse_bool("BACKSTORY_DEMO_DATA", &demo)?;
        }

        Ok(config)
    }

    /// Instantiate the configured classifier.
    pub fn build_classifier(&self) -> Result<Arc<dyn ConsistencyClassifier>, ReasoningError> {
        let classifier: Arc<dyn ConsistencyClassifier> = match self.reasoner {
            ReasonerKind::Ollama => Arc::new(OllamaClassifier::new(
                &self.ollama_url,
                &self.model,
                DEFAULT_REASONING_TIMEOUT_SECS,
            )?),
            ReasonerKind::Stub => Arc::new(StubClassifier::lexical()),
            ReasonerKind::Unavailable => {
                Arc::new(UnavailableClassifier::new(self.unavailable_delay()))
            }
        };
        Ok(classifier)
    }

    /// Mock round-trip delay of the fallback classifier; none when instant.
    fn unavailable_delay(&self) -> Duration {
        if self.timing == PipelineTiming::instant() {
            Duration::ZERO
        } else {
            Duration::from_secs(1)
        }
    }
}
