//! Reasoning backend adapter for a local Ollama instance.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::parser::parse_verdict;
use super::prompt::{build_reasoning_prompt, REASONER_SYSTEM_PROMPT};
use super::{ConsistencyClassifier, ReasoningError};
use crate::pipeline::types::Verdict;

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default reasoning model.
pub const DEFAULT_REASONING_MODEL: &str = "llama3.1:8b";

/// Ollama HTTP client specialised for consistency reasoning.
pub struct OllamaClassifier {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OllamaClassifier {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, ReasoningError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ReasoningError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_send_error(&self, e: reqwest::Error) -> ReasoningError {
        if e.is_connect() {
            ReasoningError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ReasoningError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            ReasoningError::HttpClient(e.to_string())
        }
    }

    /// Raw text generation against `/api/generate`.
    pub async fn generate(&self, prompt: &str, system: &str) -> Result<String, ReasoningError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            format: "json",
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReasoningError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::JsonParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    pub async fn list_models(&self) -> Result<Vec<String>, ReasoningError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReasoningError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::JsonParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    pub async fn is_model_available(&self) -> Result<bool, ReasoningError> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| m.starts_with(&self.model)))
    }

    /// Startup check: log whether the configured model is pulled. Never
    /// fails; an unreachable backend counts as unavailable.
    pub async fn check_model(&self) -> bool {
        match self.is_model_available().await {
            Ok(true) => {
                tracing::info!(model = %self.model, url = %self.base_url, "Reasoning model available");
                true
            }
            Ok(false) => {
                tracing::warn!(
                    model = %self.model,
                    "Reasoning model not found; run `ollama pull {}`",
                    self.model
                );
                false
            }
            Err(e) => {
                tracing::warn!(url = %self.base_url, error = %e, "Ollama not reachable");
                false
            }
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TagsModel>,
}

#[derive(Deserialize)]
struct TagsModel {
    name: String,
}

#[async_trait]
impl ConsistencyClassifier for OllamaClassifier {
    async fn classify(
        &self,
        character: &str,
        claim: &str,
        evidence: &[String],
    ) -> Result<Verdict, ReasoningError> {
        let prompt = build_reasoning_prompt(character, claim, evidence);
        let raw = self.generate(&prompt, REASONER_SYSTEM_PROMPT).await?;
        parse_verdict(&raw)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
