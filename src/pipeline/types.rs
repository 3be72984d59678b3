//! Domain types shared by the sequencer, evaluator and collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::stage::Stage;

/// Rationale recorded when the classifier fails for an item.
pub const ERROR_RATIONALE: &str = "Error during reasoning phase. Defaulting to 0.";

/// Rationale recorded when the classifier produced no output for an item.
pub const UNAVAILABLE_RATIONALE: &str = "Reasoning output unavailable. Defaulting to 0.";

/// Rationale used when the backend answers without one.
pub const MISSING_RATIONALE: &str = "No rationale provided.";

// ═══════════════════════════════════════════
// Prediction / Verdict
// ═══════════════════════════════════════════

/// Binary consistency judgement. Serialized as `0` / `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Prediction {
    /// The evidence contradicts the claim.
    Contradicted,
    /// The claim is consistent with the evidence.
    Consistent,
}

impl Prediction {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Contradicted => 0,
            Self::Consistent => 1,
        }
    }

    /// Lenient mapping: only an exact `1` counts as consistent.
    pub fn from_i64_lenient(value: i64) -> Self {
        if value == 1 {
            Self::Consistent
        } else {
            Self::Contradicted
        }
    }
}

impl From<Prediction> for u8 {
    fn from(p: Prediction) -> u8 {
        p.as_u8()
    }
}

impl TryFrom<u8> for Prediction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Contradicted),
            1 => Ok(Self::Consistent),
            other => Err(format!("prediction must be 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Result of classifying one item. Prediction and rationale always travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub prediction: Prediction,
    pub rationale: String,
}

impl Verdict {
    pub fn new(prediction: Prediction, rationale: impl Into<String>) -> Self {
        Self {
            prediction,
            rationale: rationale.into(),
        }
    }

    /// Default verdict substituted when classification fails.
    pub fn error_default() -> Self {
        Self::new(Prediction::Contradicted, ERROR_RATIONALE)
    }

    /// Default verdict substituted when classification yields nothing.
    pub fn unavailable() -> Self {
        Self::new(Prediction::Contradicted, UNAVAILABLE_RATIONALE)
    }
}

// ═══════════════════════════════════════════
// VerificationItem
// ═══════════════════════════════════════════

/// One backstory claim plus the excerpts it is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationItem {
    pub id: String,
    pub book_name: String,
    pub character: String,
    pub claim: String,
    /// Ordered evidence excerpts.
    pub evidence: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Verdict>,
}

impl VerificationItem {
    pub fn new(
        id: impl Into<String>,
        book_name: impl Into<String>,
        character: impl Into<String>,
        claim: impl Into<String>,
        evidence: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            book_name: book_name.into(),
            character: character.into(),
            claim: claim.into(),
            evidence,
            result: None,
        }
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }
}

/// Clear every result in place.
pub fn clear_results(items: &mut [VerificationItem]) {
    for item in items {
        item.clear_result();
    }
}

// ═══════════════════════════════════════════
// Training labels
// ═══════════════════════════════════════════

/// Label attached to a training record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    Known(Prediction),
    /// Any label that is not `0`/`1`, kept verbatim.
    Raw(String),
}

impl LabelValue {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "0" => Self::Known(Prediction::Contradicted),
            "1" => Self::Known(Prediction::Consistent),
            other => Self::Raw(other.to_string()),
        }
    }

    pub fn prediction(&self) -> Option<Prediction> {
        match self {
            Self::Known(p) => Some(*p),
            Self::Raw(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainLabel {
    pub id: String,
    pub label: LabelValue,
}

// ═══════════════════════════════════════════
// Novels
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NovelStatus {
    Pending,
    Processed,
}

/// A source novel known to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Novel {
    pub id: String,
    pub title: String,
    pub author: String,
    pub chunk_count: u32,
    pub status: NovelStatus,
}

// ═══════════════════════════════════════════
// Pipeline events
// ═══════════════════════════════════════════

/// Event published to the presentation layer while a run progresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    StageChanged {
        stage: Stage,
    },
    ItemStarted {
        index: usize,
        id: String,
    },
    ItemResolved {
        index: usize,
        item: VerificationItem,
    },
    BatchCompleted {
        item_count: usize,
        duration_ms: u64,
    },
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> VerificationItem {
        VerificationItem::new(
            "t1",
            "The Great Gatsby",
            "Jay Gatsby",
            "Gatsby inherited his money.",
            vec!["His parents were shiftless and unsuccessful farm people.".into()],
        )
    }

    #[test]
    fn prediction_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Prediction::Consistent).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Prediction::Contradicted).unwrap(), "0");
        let parsed: Prediction = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Prediction::Consistent);
        assert!(serde_json::from_str::<Prediction>("2").is_err());
    }

    #[test]
    fn lenient_prediction_only_accepts_one() {
        assert_eq!(Prediction::from_i64_lenient(1), Prediction::Consistent);
        assert_eq!(Prediction::from_i64_lenient(0), Prediction::Contradicted);
        assert_eq!(Prediction::from_i64_lenient(7), Prediction::Contradicted);
        assert_eq!(Prediction::from_i64_lenient(-1), Prediction::Contradicted);
    }

    #[test]
    fn new_item_has_no_result() {
        let item = item();
        assert!(!item.has_result());
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("result"));
    }

    #[test]
    fn clear_results_resets_every_item() {
        let mut items = vec![item(), item()];
        for it in &mut items {
            it.result = Some(Verdict::new(Prediction::Consistent, "fine"));
        }
        clear_results(&mut items);
        assert!(items.iter().all(|i| i.result.is_none()));
    }

    #[test]
    fn default_verdicts_are_contradictions() {
        assert_eq!(Verdict::error_default().prediction, Prediction::Contradicted);
        assert_eq!(Verdict::error_default().rationale, ERROR_RATIONALE);
        assert_eq!(Verdict::unavailable().rationale, UNAVAILABLE_RATIONALE);
    }

    #[test]
    fn label_value_parsing() {
        assert_eq!(LabelValue::parse("1"), LabelValue::Known(Prediction::Consistent));
        assert_eq!(LabelValue::parse(" 0 "), LabelValue::Known(Prediction::Contradicted));
        assert_eq!(
            LabelValue::parse("contradict"),
            LabelValue::Raw("contradict".into())
        );
        assert_eq!(LabelValue::parse("consistent").prediction(), None);
    }

    #[test]
    fn pipeline_event_is_tagged() {
        let event = PipelineEvent::StageChanged {
            stage: Stage::Chunking,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"StageChanged\""));
        assert!(json.contains("\"stage\":\"CHUNKING\""));
    }
}
