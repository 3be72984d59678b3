//! StageSequencer: drives one logical run through the fixed stage order.
//!
//! The sequencer emits `Ingestion → Chunking → Embedding → Clustering →
//! Retrieval`, holding each for its settling interval, then hands over by
//! emitting `Reasoning`. It never emits `Complete` on its own: the caller
//! signals that with [`StageSequencer::complete`] once reasoning is done.
//!
//! Runs are tagged with a generation. `cancel()`/`reset()` bump it, and a run
//! that wakes up under a stale generation returns without emitting anything.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use super::stage::Stage;
use crate::pipeline_config::PipelineTiming;

/// Callback invoked with the new stage on every transition.
pub type StageObserver = Arc<dyn Fn(Stage) + Send + Sync>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SequencerError {
    #[error("A pipeline run is already in progress")]
    AlreadyRunning,

    #[error("Pipeline run was cancelled")]
    Cancelled,
}

// ═══════════════════════════════════════════════════════════
// Observer registry
// ═══════════════════════════════════════════════════════════

struct ObserverEntry {
    id: u64,
    callback: StageObserver,
}

#[derive(Default)]
struct ObserverRegistry {
    next_id: u64,
    entries: Vec<ObserverEntry>,
}

impl ObserverRegistry {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

/// Handle returned by [`StageSequencer::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    id: u64,
    registry: Arc<Mutex<ObserverRegistry>>,
}

impl Subscription {
    /// Deregister exactly this observer. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.entries.retain(|e| e.id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .lock()
            .map(|r| r.contains(self.id))
            .unwrap_or(false)
    }
}

/// Proof that a run reached `Reasoning`, consumed by [`StageSequencer::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    pub generation: u64,
}

// ═══════════════════════════════════════════════════════════
// StageSequencer
// ═══════════════════════════════════════════════════════════

pub struct StageSequencer {
    observers: Arc<Mutex<ObserverRegistry>>,
    current: Mutex<Stage>,
    /// Generation of the run currently in flight, if any.
    active_run: Mutex<Option<u64>>,
    generation: AtomicU64,
    ready_at: Instant,
    timing: PipelineTiming,
}

impl StageSequencer {
    /// Create a sequencer. Readiness flips after `timing.connect_delay`.
    pub fn new(timing: PipelineTiming) -> Self {
        let ready_at = Instant::now() + timing.connect_delay;
        Self {
            observers: Arc::new(Mutex::new(ObserverRegistry::default())),
            current: Mutex::new(Stage::Idle),
            active_run: Mutex::new(None),
            generation: AtomicU64::new(0),
            ready_at,
            timing,
        }
    }

    pub fn timing(&self) -> &PipelineTiming {
        &self.timing
    }

    pub fn current_stage(&self) -> Stage {
        self.current.lock().map(|s| *s).unwrap_or(Stage::Idle)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.active_run.lock().map(|r| r.is_some()).unwrap_or(false)
    }

    // ── Connection readiness ────────────────────────────────

    pub fn is_ready(&self) -> bool {
        Instant::now() >= self.ready_at
    }

    /// Block until the backend connection is established. Never fails.
    pub async fn wait_ready(&self) {
        if !self.is_ready() {
            tokio::time::sleep_until(self.ready_at).await;
        }
    }

    // ── Observers ───────────────────────────────────────────

    /// Register an observer for every subsequent transition.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(Stage) + Send + Sync + 'static,
    {
        let id = match self.observers.lock() {
            Ok(mut registry) => {
                let id = registry.next_id;
                registry.next_id += 1;
                registry.entries.push(ObserverEntry {
                    id,
                    callback: Arc::new(observer),
                });
                id
            }
            Err(_) => {
                tracing::error!("Observer registry poisoned, subscription ignored");
                u64::MAX
            }
        };
        Subscription {
            id,
            registry: Arc::clone(&self.observers),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().map(|r| r.entries.len()).unwrap_or(0)
    }

    /// Broadcast from a snapshot. Each observer is re-checked right before it
    /// is called, so one removed mid-broadcast is skipped.
    fn notify(&self, stage: Stage) {
        let snapshot: Vec<(u64, StageObserver)> = match self.observers.lock() {
            Ok(registry) => registry
                .entries
                .iter()
                .map(|e| (e.id, Arc::clone(&e.callback)))
                .collect(),
            Err(_) => return,
        };

        for (id, callback) in snapshot {
            let still_registered = self
                .observers
                .lock()
                .map(|r| r.contains(id))
                .unwrap_or(false);
            if still_registered {
                callback(stage);
            }
        }
    }

    fn transition(&self, stage: Stage) {
        if let Ok(mut current) = self.current.lock() {
            *current = stage;
        }
        tracing::info!(stage = %stage, label = stage.label(), "Pipeline stage changed");
        self.notify(stage);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn finish_run(&self, generation: u64) {
        if let Ok(mut active) = self.active_run.lock() {
            if *active == Some(generation) {
                *active = None;
            }
        }
    }

    // ── Run lifecycle ───────────────────────────────────────

    /// Drive one run from `Ingestion` to `Reasoning`.
    ///
    /// Waits for readiness first. Fails with `AlreadyRunning` if another run
    /// is in flight, and with `Cancelled` if the run was abandoned while
    /// suspended.
    pub async fn run(&self) -> Result<RunTicket, SequencerError> {
        let generation = {
            let mut active = self
                .active_run
                .lock()
                .map_err(|_| SequencerError::AlreadyRunning)?;
            if active.is_some() {
                return Err(SequencerError::AlreadyRunning);
            }
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *active = Some(generation);
            generation
        };

        let result = self.drive(generation).await;
        self.finish_run(generation);
        result
    }

    async fn drive(&self, generation: u64) -> Result<RunTicket, SequencerError> {
        if !self.is_ready() {
            tracing::warn!("Waiting for pipeline backend connection");
            self.wait_ready().await;
        }

        for stage in Stage::SIMULATED {
            if !self.is_current(generation) {
                tracing::debug!(generation, "Stale run abandoned before {stage}");
                return Err(SequencerError::Cancelled);
            }
            self.transition(stage);
            tokio::time::sleep(self.timing.settle_for(stage)).await;
        }

        if !self.is_current(generation) {
            return Err(SequencerError::Cancelled);
        }
        self.transition(Stage::Reasoning);
        Ok(RunTicket { generation })
    }

    /// Signal that reasoning finished for the run identified by `ticket`.
    pub fn complete(&self, ticket: RunTicket) -> Result<(), SequencerError> {
        if !self.is_current(ticket.generation) {
            return Err(SequencerError::Cancelled);
        }
        self.transition(Stage::Complete);
        Ok(())
    }

    /// Abandon the in-flight run, if any. The run stops at its next
    /// suspension point and emits nothing further.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut active) = self.active_run.lock() {
            *active = None;
        }
    }

    /// Cancel any run and go back to `Idle`.
    pub fn reset(&self) {
        self.cancel();
        self.transition(Stage::Idle);
    }
}
