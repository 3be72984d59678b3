//! Dashboard stats overview.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::types::{Novel, TrainLabel, VerificationItem};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsOverview {
    pub novel_count: usize,
    /// Distinct characters across the verification items.
    pub character_count: usize,
    /// Total chunks across the catalog.
    pub embedding_count: u64,
    pub train_label_count: usize,
    /// Percentage of resolved items whose prediction matches the training
    /// label with the same id. `None` without any overlap.
    pub reasoning_accuracy: Option<f64>,
}

pub fn compute_stats(
    novels: &[Novel],
    items: &[VerificationItem],
    train: &[TrainLabel],
) -> StatsOverview {
    let characters: HashSet<&str> = items.iter().map(|i| i.character.as_str()).collect();

    StatsOverview {
        novel_count: novels.len(),
        character_count: characters.len(),
        embedding_count: novels.iter().map(|n| u64::from(n.chunk_count)).sum(),
        train_label_count: train.len(),
        reasoning_accuracy: reasoning_accuracy(items, train),
    }
}

fn reasoning_accuracy(items: &[VerificationItem], train: &[TrainLabel]) -> Option<f64> {
    let labels: HashMap<&str, _> = train
        .iter()
        .filter_map(|t| t.label.prediction().map(|p| (t.id.as_str(), p)))
        .collect();

    let (matched, compared) = items
        .iter()
        .filter_map(|item| {
            let verdict = item.result.as_ref()?;
            let expected = labels.get(item.id.as_str())?;
            Some(verdict.prediction == *expected)
        })
        .fold((0usize, 0usize), |(m, c), hit| (m + usize::from(hit), c + 1));

    (compared > 0).then(|| matched as f64 * 100.0 / compared as f64)
}
