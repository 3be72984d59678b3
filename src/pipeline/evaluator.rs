//! ConsistencyEvaluator: classifies a batch of items strictly in order.
//!
//! One classification call at a time: item `i + 1` is not started until item
//! `i` has its verdict stored and published. A failing (or panicking)
//! classifier never aborts the batch; the item gets a default contradiction
//! verdict instead.

use std::panic::AssertUnwindSafe;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use futures_util::FutureExt;

use super::reasoning::{ConsistencyClassifier, ReasoningError};
use super::types::{clear_results, Verdict, VerificationItem};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EvaluatorError {
    #[error("Cannot evaluate an empty batch")]
    EmptyBatch,

    #[error("Evaluation was cancelled")]
    Cancelled,
}

/// Progress reported while a batch runs.
#[derive(Debug, Clone, Copy)]
pub enum EvaluationProgress<'a> {
    /// Classification of `item` is about to start.
    ItemStarted {
        index: usize,
        item: &'a VerificationItem,
    },
    /// `item` now carries its verdict.
    ItemResolved {
        index: usize,
        item: &'a VerificationItem,
    },
}

/// Result of a completed batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Every item, each with a verdict.
    pub items: Vec<VerificationItem>,
    /// Items whose verdict is a substituted default.
    pub failures: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Default)]
struct EvaluatorState {
    generation: u64,
    processing: Option<usize>,
}

pub struct ConsistencyEvaluator {
    pacing: Duration,
    state: Mutex<EvaluatorState>,
}

impl ConsistencyEvaluator {
    /// `pacing` is the pause after each item before the next one starts.
    pub fn new(pacing: Duration) -> Self {
        Self {
            pacing,
            state: Mutex::new(EvaluatorState::default()),
        }
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Index of the item being classified, `None` between batches.
    pub fn processing_index(&self) -> Option<usize> {
        self.state.lock().ok().and_then(|s| s.processing)
    }

    /// Abandon the running batch, if any.
    pub fn cancel(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.generation += 1;
            state.processing = None;
        }
    }

    fn begin(&self) -> u64 {
        match self.state.lock() {
            Ok(mut state) => {
                state.generation += 1;
                state.processing = None;
                state.generation
            }
            Err(_) => u64::MAX,
        }
    }

    /// Set the processing index if `generation` is still current.
    fn mark_processing(&self, generation: u64, index: Option<usize>) -> bool {
        match self.state.lock() {
            Ok(mut state) if state.generation == generation => {
                state.processing = index;
                true
            }
            _ => false,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state
            .lock()
            .map(|s| s.generation == generation)
            .unwrap_or(false)
    }

    /// Classify every item in index order.
    ///
    /// Prior results are cleared before the first call. Starting a new batch
    /// abandons any batch still in flight on this evaluator.
    pub async fn start<F>(
        &self,
        mut items: Vec<VerificationItem>,
        classifier: &dyn ConsistencyClassifier,
        mut on_progress: F,
    ) -> Result<BatchOutcome, EvaluatorError>
    where
        F: FnMut(EvaluationProgress<'_>) + Send,
    {
        if items.is_empty() {
            return Err(EvaluatorError::EmptyBatch);
        }

        let generation = self.begin();
        let started = Instant::now();
        clear_results(&mut items);

        tracing::info!(
            items = items.len(),
            classifier = classifier.name(),
            "Consistency evaluation started"
        );

        let mut failures = 0usize;

        for index in 0..items.len() {
            if !self.mark_processing(generation, Some(index)) {
                return Err(EvaluatorError::Cancelled);
            }
            on_progress(EvaluationProgress::ItemStarted {
                index,
                item: &items[index],
            });

            let item = &items[index];
            let verdict = classify_guarded(classifier, item).await;

            if !self.is_current(generation) {
                tracing::debug!(index, "Discarding verdict from abandoned batch");
                return Err(EvaluatorError::Cancelled);
            }

            let verdict = match verdict {
                Ok(v) => v,
                Err(fallback) => {
                    failures += 1;
                    fallback
                }
            };

            tracing::info!(
                index,
                id = %items[index].id,
                prediction = %verdict.prediction,
                "Item classified"
            );
            items[index].result = Some(verdict);
            on_progress(EvaluationProgress::ItemResolved {
                index,
                item: &items[index],
            });

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        if !self.mark_processing(generation, None) {
            return Err(EvaluatorError::Cancelled);
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            items = items.len(),
            failures,
            duration_ms,
            "Consistency evaluation completed"
        );

        Ok(BatchOutcome {
            items,
            failures,
            duration_ms,
        })
    }
}

/// Run one classification, turning every failure into a default verdict.
/// `Err` carries the substituted verdict.
async fn classify_guarded(
    classifier: &dyn ConsistencyClassifier,
    item: &VerificationItem,
) -> Result<Verdict, Verdict> {
    let call = classifier.classify(&item.character, &item.claim, &item.evidence);

    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(verdict)) => Ok(verdict),
        Ok(Err(ReasoningError::NoOutput)) => {
            tracing::warn!(id = %item.id, "Classifier returned no output");
            Err(Verdict::unavailable())
        }
        Ok(Err(e)) => {
            tracing::warn!(id = %item.id, error = %e, "Classification failed, defaulting to 0");
            Err(Verdict::error_default())
        }
        Err(_) => {
            tracing::error!(id = %item.id, "Classifier panicked, defaulting to 0");
            Err(Verdict::error_default())
        }
    }
}
