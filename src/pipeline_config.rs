//! Pipeline timing configuration.
//!
//! The ingestion-side stages are simulated: each one holds the pipeline for a
//! settling interval before the next transition. These durations, the one-time
//! backend connection delay and the pacing between classifications all live
//! here so tests can run the exact same sequence with zero delays.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pipeline::stage::Stage;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Named timing preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingPreset {
    /// Paced like the live dashboard demo.
    Demo,
    /// All delays zero.
    Instant,
}

impl TimingPreset {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Some(Self::Demo),
            "instant" => Some(Self::Instant),
            _ => None,
        }
    }
}

/// Every delay the pipeline observes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTiming {
    /// One-time delay before the sequencer reports ready.
    pub connect_delay: Duration,
    pub ingestion_settle: Duration,
    pub chunking_settle: Duration,
    pub embedding_settle: Duration,
    pub clustering_settle: Duration,
    pub retrieval_settle: Duration,
    /// Pause after each classification, before the next item starts.
    pub item_pacing: Duration,
}

// ═══════════════════════════════════════════════════════════
// Derivation
// ═══════════════════════════════════════════════════════════

impl PipelineTiming {
    pub fn demo() -> Self {
        Self {
            connect_delay: Duration::from_millis(500),
            ingestion_settle: Duration::from_millis(1500),
            chunking_settle: Duration::from_millis(1200),
            embedding_settle: Duration::from_millis(1800),
            clustering_settle: Duration::from_millis(1500),
            retrieval_settle: Duration::from_millis(1200),
            item_pacing: Duration::from_millis(1000),
        }
    }

    pub fn instant() -> Self {
        Self {
            connect_delay: Duration::ZERO,
            ingestion_settle: Duration::ZERO,
            chunking_settle: Duration::ZERO,
            embedding_settle: Duration::ZERO,
            clustering_settle: Duration::ZERO,
            retrieval_settle: Duration::ZERO,
            item_pacing: Duration::ZERO,
        }
    }

    pub fn from_preset(preset: TimingPreset) -> Self {
        match preset {
            TimingPreset::Demo => Self::demo(),
            TimingPreset::Instant => Self::instant(),
        }
    }

    /// How long the pipeline holds on `stage` before moving on.
    /// Zero for stages the sequencer does not settle on.
    pub fn settle_for(&self, stage: Stage) -> Duration {
        match stage {
            Stage::Ingestion => self.ingestion_settle,
            Stage::Chunking => self.chunking_settle,
            Stage::Embedding => self.embedding_settle,
            Stage::Clustering => self.clustering_settle,
            Stage::Retrieval => self.retrieval_settle,
            Stage::Idle | Stage::Reasoning | Stage::Complete => Duration::ZERO,
        }
    }

    /// Total simulated time from first transition to `Reasoning`.
    pub fn total_settle(&self) -> Duration {
        Stage::SIMULATED.iter().map(|s| self.settle_for(*s)).sum()
    }
}

impl Default for PipelineTiming {
    fn default() -> Self {
        Self::demo()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
