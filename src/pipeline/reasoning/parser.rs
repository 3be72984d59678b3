//! Parsing of raw reasoning-model output into a [`Verdict`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::ReasoningError;
use crate::pipeline::types::{Prediction, Verdict, MISSING_RATIONALE};

/// Strip model artifacts before parsing.
///
/// Handles thinking blocks (`<think>...</think>`, `<unusedN>thought\n...`),
/// stray `<unusedN>` tokens and Markdown code fences.
pub fn sanitize_model_output(raw: &str) -> String {
    static THINK_BLOCK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));
    static UNUSED_TOKEN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<unused\d+>").expect("valid regex"));
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"```(?:json)?").expect("valid regex"));

    let mut text = THINK_BLOCK_RE.replace_all(raw, "").to_string();

    if let Some(idx) = text.find("<unused") {
        if let Some(thought_offset) = text[idx..].find("thought\n") {
            text = text[idx + thought_offset + 8..].to_string();
        }
    }

    text = UNUSED_TOKEN_RE.replace_all(&text, "").to_string();
    text = FENCE_RE.replace_all(&text, "").to_string();
    text.trim().to_string()
}

/// Slice out the outermost `{ ... }` object.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[derive(Deserialize)]
struct RawVerdict {
    prediction: Option<serde_json::Value>,
    rationale: Option<String>,
}

/// Interpret a prediction field leniently: only a value equal to 1 counts
/// as consistent.
fn lenient_prediction(value: Option<&serde_json::Value>) -> Prediction {
    match value {
        Some(serde_json::Value::Number(n)) => {
            if n.as_i64() == Some(1) || n.as_f64() == Some(1.0) {
                Prediction::Consistent
            } else {
                Prediction::Contradicted
            }
        }
        Some(serde_json::Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(v) => Prediction::from_i64_lenient(v),
            Err(_) => Prediction::Contradicted,
        },
        _ => Prediction::Contradicted,
    }
}

/// Parse a model response into a verdict.
pub fn parse_verdict(raw: &str) -> Result<Verdict, ReasoningError> {
    let text = sanitize_model_output(raw);
    if text.is_empty() {
        return Err(ReasoningError::NoOutput);
    }

    let json = extract_json_object(&text)
        .ok_or_else(|| ReasoningError::MalformedResponse("No JSON object found".into()))?;

    let parsed: RawVerdict =
        serde_json::from_str(json).map_err(|e| ReasoningError::JsonParsing(e.to_string()))?;

    let rationale = parsed
        .rationale
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| MISSING_RATIONALE.to_string());

    Ok(Verdict::new(
        lenient_prediction(parsed.prediction.as_ref()),
        rationale,
    ))
}
