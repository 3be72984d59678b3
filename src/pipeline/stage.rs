//! Pipeline stages and their relative status.
//!
//! The stage set is fixed and totally ordered. `Idle` is the only initial
//! stage and `Complete` the only terminal one; the six stages in between are
//! the "active" stages shown on the pipeline board.

use std::fmt;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Stage
// ═══════════════════════════════════════════════════════════

/// One named step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Idle,
    Ingestion,
    Chunking,
    Embedding,
    Clustering,
    Retrieval,
    Reasoning,
    Complete,
}

impl Stage {
    /// Active stages in execution order.
    pub const ACTIVE: [Stage; 6] = [
        Stage::Ingestion,
        Stage::Chunking,
        Stage::Embedding,
        Stage::Clustering,
        Stage::Retrieval,
        Stage::Reasoning,
    ];

    /// Stages the sequencer settles on before handing over to reasoning.
    pub const SIMULATED: [Stage; 5] = [
        Stage::Ingestion,
        Stage::Chunking,
        Stage::Embedding,
        Stage::Clustering,
        Stage::Retrieval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Ingestion => "INGESTION",
            Self::Chunking => "CHUNKING",
            Self::Embedding => "EMBEDDING",
            Self::Clustering => "CLUSTERING",
            Self::Retrieval => "RETRIEVAL",
            Self::Reasoning => "REASONING",
            Self::Complete => "COMPLETE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "IDLE" => Some(Self::Idle),
            "INGESTION" => Some(Self::Ingestion),
            "CHUNKING" => Some(Self::Chunking),
            "EMBEDDING" => Some(Self::Embedding),
            "CLUSTERING" => Some(Self::Clustering),
            "RETRIEVAL" => Some(Self::Retrieval),
            "REASONING" => Some(Self::Reasoning),
            "COMPLETE" => Some(Self::Complete),
            _ => None,
        }
    }

    /// Human-readable label for the pipeline board.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Ingestion => "Data Ingestion",
            Self::Chunking => "Text Chunking",
            Self::Embedding => "Vector Embedding",
            Self::Clustering => "Memory Clustering",
            Self::Retrieval => "Context Retrieval",
            Self::Reasoning => "Reasoning",
            Self::Complete => "Complete",
        }
    }

    /// Position among the active stages, `None` for `Idle`/`Complete`.
    pub fn active_index(&self) -> Option<usize> {
        Self::ACTIVE.iter().position(|s| s == self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Whether a run is in progress while the pipeline sits on this stage.
    pub fn is_running(&self) -> bool {
        self.active_index().is_some()
    }

    /// Status of `self` as seen from `current`.
    pub fn status_relative_to(&self, current: Stage) -> StageStatus {
        match current {
            Stage::Complete => return StageStatus::Completed,
            Stage::Idle => return StageStatus::Pending,
            _ => {}
        }
        match (self.active_index(), current.active_index()) {
            (Some(own), Some(cur)) if own < cur => StageStatus::Completed,
            (Some(own), Some(cur)) if own == cur => StageStatus::Active,
            _ => StageStatus::Pending,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════
// StageStatus
// ═══════════════════════════════════════════════════════════

/// How an active stage relates to the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Active,
    Pending,
}

/// One row of the pipeline board.
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    pub stage: Stage,
    pub label: &'static str,
    pub status: StageStatus,
}

/// The full board for the given current stage.
pub fn stage_board(current: Stage) -> Vec<StageView> {
    Stage::ACTIVE
        .iter()
        .map(|&stage| StageView {
            stage,
            label: stage.label(),
            status: stage.status_relative_to(current),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_roundtrip() {
        let all = [
            Stage::Idle,
            Stage::Ingestion,
            Stage::Chunking,
            Stage::Embedding,
            Stage::Clustering,
            Stage::Retrieval,
            Stage::Reasoning,
            Stage::Complete,
        ];
        for stage in all {
            assert_eq!(Stage::from_str(stage.as_str()), Some(stage));
        }
        assert_eq!(Stage::from_str("DONE"), None);
    }

    #[test]
    fn order_is_total_and_fixed() {
        assert!(Stage::Idle < Stage::Ingestion);
        assert!(Stage::Retrieval < Stage::Reasoning);
        assert!(Stage::Reasoning < Stage::Complete);
        let mut sorted = Stage::ACTIVE;
        sorted.sort();
        assert_eq!(sorted, Stage::ACTIVE);
    }

    #[test]
    fn only_active_stages_have_index() {
        assert_eq!(Stage::Idle.active_index(), None);
        assert_eq!(Stage::Complete.active_index(), None);
        assert_eq!(Stage::Ingestion.active_index(), Some(0));
        assert_eq!(Stage::Reasoning.active_index(), Some(5));
    }

    #[test]
    fn status_relative_to_middle_stage() {
        let current = Stage::Embedding;
        assert_eq!(Stage::Ingestion.status_relative_to(current), StageStatus::Completed);
        assert_eq!(Stage::Chunking.status_relative_to(current), StageStatus::Completed);
        assert_eq!(Stage::Embedding.status_relative_to(current), StageStatus::Active);
        assert_eq!(Stage::Clustering.status_relative_to(current), StageStatus::Pending);
        assert_eq!(Stage::Reasoning.status_relative_to(current), StageStatus::Pending);
    }

    #[test]
    fn idle_and_complete_override_order() {
        for stage in Stage::ACTIVE {
            assert_eq!(stage.status_relative_to(Stage::Idle), StageStatus::Pending);
            assert_eq!(stage.status_relative_to(Stage::Complete), StageStatus::Completed);
        }
    }

    #[test]
    fn board_has_six_rows() {
        let board = stage_board(Stage::Reasoning);
        assert_eq!(board.len(), 6);
        assert_eq!(board[5].status, StageStatus::Active);
        assert_eq!(board[0].label, "Data Ingestion");
    }

    #[test]
    fn stage_serializes_as_wire_name() {
        let json = serde_json::to_string(&Stage::Reasoning).unwrap();
        assert_eq!(json, "\"REASONING\"");
        let parsed: Stage = serde_json::from_str("\"COMPLETE\"").unwrap();
        assert_eq!(parsed, Stage::Complete);
    }
}
