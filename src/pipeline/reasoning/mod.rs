//! Consistency reasoning: the pluggable classification capability.
//!
//! The evaluator only sees [`ConsistencyClassifier`]. Three implementations
//! ship with the crate:
//! - `StubClassifier`: deterministic, for tests and offline runs
//! - `UnavailableClassifier`: the fallback when no backend is configured
//! - `OllamaClassifier`: a local Ollama server reached over HTTP

pub mod ollama;
pub mod parser;
pub mod prompt;
pub mod stub;

pub use ollama::OllamaClassifier;
pub use parser::{parse_verdict, sanitize_model_output};
pub use prompt::{build_reasoning_prompt, REASONER_SYSTEM_PROMPT};
pub use stub::{StubClassifier, UnavailableClassifier};

use async_trait::async_trait;
use thiserror::Error;

use super::types::Verdict;

#[derive(Error, Debug)]
pub enum ReasoningError {
    #[error("Reasoning backend is not reachable at {0}")]
    Connection(String),

    #[error("Reasoning backend returned error (status {status}): {body}")]
    Backend { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Reasoning backend returned no output")]
    NoOutput,

    #[error("Malformed reasoning response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),
}

/// Maps `(character, claim, evidence)` to a binary verdict with a rationale.
///
/// Implementations may suspend for as long as they need; the evaluator
/// imposes no timeout of its own.
#[async_trait]
pub trait ConsistencyClassifier: Send + Sync {
    async fn classify(
        &self,
        character: &str,
        claim: &str,
        evidence: &[String],
    ) -> Result<Verdict, ReasoningError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
