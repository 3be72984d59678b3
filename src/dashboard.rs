//! Dashboard: the orchestrating owner of one pipeline.
//!
//! Holds the item list, catalog and training labels, owns the sequencer and
//! the evaluator, and republishes everything that happens as a single
//! [`PipelineEvent`] stream. Shared behind an `Arc` by the HTTP layer.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use tokio::sync::broadcast;

use crate::pipeline::evaluator::{ConsistencyEvaluator, EvaluationProgress, EvaluatorError};
use crate::pipeline::export::{self, ExportError};
use crate::pipeline::import::{self, ImportError, UploadedBook};
use crate::pipeline::reasoning::ConsistencyClassifier;
use crate::pipeline::sequencer::{SequencerError, StageSequencer, Subscription};
use crate::pipeline::stage::{stage_board, Stage, StageView};
use crate::pipeline::stats::{compute_stats, StatsOverview};
use crate::pipeline::types::{
    clear_results, Novel, PipelineEvent, TrainLabel, VerificationItem,
};
use crate::pipeline::demo;
use crate::pipeline_config::PipelineTiming;

/// Buffered events per subscriber before slow receivers start lagging.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("No verification items loaded")]
    EmptyInput,

    #[error("A pipeline run is already in progress")]
    AlreadyRunning,

    #[error("Pipeline run was cancelled")]
    Cancelled,

    #[error("Internal lock error")]
    LockPoisoned,

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl From<SequencerError> for DashboardError {
    fn from(e: SequencerError) -> Self {
        match e {
            SequencerError::AlreadyRunning => Self::AlreadyRunning,
            SequencerError::Cancelled => Self::Cancelled,
        }
    }
}

impl From<EvaluatorError> for DashboardError {
    fn from(e: EvaluatorError) -> Self {
        match e {
            EvaluatorError::EmptyBatch => Self::EmptyInput,
            EvaluatorError::Cancelled => Self::Cancelled,
        }
    }
}

/// A run slot claimed by [`Dashboard::begin_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunClaim {
    generation: u64,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub item_count: usize,
    pub failures: usize,
    pub duration_ms: u64,
}

/// Point-in-time view for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatus {
    pub stage: Stage,
    pub stage_label: &'static str,
    /// Whether the backend connection is established.
    pub connected: bool,
    pub running: bool,
    pub processing_index: Option<usize>,
    pub item_count: usize,
    pub resolved_count: usize,
    pub board: Vec<StageView>,
}

#[derive(Default)]
struct DashboardData {
    items: Vec<VerificationItem>,
    novels: Vec<Novel>,
    train: Vec<TrainLabel>,
}

pub struct Dashboard {
    sequencer: Arc<StageSequencer>,
    evaluator: ConsistencyEvaluator,
    classifier: Arc<dyn ConsistencyClassifier>,
    data: RwLock<DashboardData>,
    /// Generation of the run holding the slot, if any.
    active_run: Mutex<Option<u64>>,
    run_counter: AtomicU64,
    events: broadcast::Sender<PipelineEvent>,
    demo_data: bool,
    _stage_forwarder: Subscription,
}

impl Dashboard {
    /// Empty dashboard.
    pub fn new(timing: PipelineTiming, classifier: Arc<dyn ConsistencyClassifier>) -> Self {
        Self::build(timing, classifier, false)
    }

    /// Dashboard preloaded with the sample catalog and items. Reset restores
    /// them.
    pub fn with_demo_data(
        timing: PipelineTiming,
        classifier: Arc<dyn ConsistencyClassifier>,
    ) -> Self {
        Self::build(timing, classifier, true)
    }

    fn build(
        timing: PipelineTiming,
        classifier: Arc<dyn ConsistencyClassifier>,
        demo_data: bool,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let evaluator = ConsistencyEvaluator::new(timing.item_pacing);
        let sequencer = Arc::new(StageSequencer::new(timing));

        let forwarder = {
            let events = events.clone();
            sequencer.subscribe(move |stage| {
                // No receivers is fine.
                let _ = events.send(PipelineEvent::StageChanged { stage });
            })
        };

        let data = if demo_data {
            DashboardData {
                items: demo::demo_items(),
                novels: demo::demo_novels(),
                train: Vec::new(),
            }
        } else {
            DashboardData::default()
        };

        tracing::info!(
            classifier = classifier.name(),
            demo_data,
            "Dashboard initialized"
        );

        Self {
            sequencer,
            evaluator,
            classifier,
            data: RwLock::new(data),
            active_run: Mutex::new(None),
            run_counter: AtomicU64::new(0),
            events,
            demo_data,
            _stage_forwarder: forwarder,
        }
    }

    pub fn sequencer(&self) -> &Arc<StageSequencer> {
        &self.sequencer
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: PipelineEvent) {
        let _ = self.events.send(event);
    }

    // ── Read access ─────────────────────────────────────────

    pub fn items(&self) -> Result<Vec<VerificationItem>, DashboardError> {
        let data = self.data.read().map_err(|_| DashboardError::LockPoisoned)?;
        Ok(data.items.clone())
    }

    pub fn novels(&self) -> Result<Vec<Novel>, DashboardError> {
        let data = self.data.read().map_err(|_| DashboardError::LockPoisoned)?;
        Ok(data.novels.clone())
    }

    pub fn train_labels(&self) -> Result<Vec<TrainLabel>, DashboardError> {
        let data = self.data.read().map_err(|_| DashboardError::LockPoisoned)?;
        Ok(data.train.clone())
    }

    pub fn is_running(&self) -> bool {
        self.active_run.lock().map(|r| r.is_some()).unwrap_or(false)
    }

    pub fn status(&self) -> Result<DashboardStatus, DashboardError> {
        let data = self.data.read().map_err(|_| DashboardError::LockPoisoned)?;
        let stage = self.sequencer.current_stage();
        Ok(DashboardStatus {
            stage,
            stage_label: stage.label(),
            connected: self.sequencer.is_ready(),
            running: self.is_running(),
            processing_index: self.evaluator.processing_index(),
            item_count: data.items.len(),
            resolved_count: data.items.iter().filter(|i| i.has_result()).count(),
            board: stage_board(stage),
        })
    }

    pub fn stats(&self) -> Result<StatsOverview, DashboardError> {
        let data = self.data.read().map_err(|_| DashboardError::LockPoisoned)?;
        Ok(compute_stats(&data.novels, &data.items, &data.train))
    }

    pub fn export_csv(&self) -> Result<String, DashboardError> {
        let data = self.data.read().map_err(|_| DashboardError::LockPoisoned)?;
        Ok(export::export_results_csv(&data.items))
    }

    pub fn export_to(&self, path: &Path) -> Result<(), DashboardError> {
        let data = self.data.read().map_err(|_| DashboardError::LockPoisoned)?;
        export::write_results(&data.items, path)?;
        Ok(())
    }

    // ── Uploads ─────────────────────────────────────────────

    /// Replace the item list. Refused while a run is in flight.
    pub fn replace_items(&self, items: Vec<VerificationItem>) -> Result<usize, DashboardError> {
        // Checked under the data lock so no run can be claimed in between.
        let mut data = self.data.write().map_err(|_| DashboardError::LockPoisoned)?;
        let running = self
            .active_run
            .lock()
            .map_err(|_| DashboardError::LockPoisoned)?
            .is_some();
        if running {
            return Err(DashboardError::AlreadyRunning);
        }
        data.items = items;
        Ok(data.items.len())
    }

    pub fn upload_items_csv(&self, text: &str) -> Result<usize, DashboardError> {
        let items = import::parse_test_items(text)?;
        self.replace_items(items)
    }

    pub fn upload_train_csv(&self, text: &str) -> Result<usize, DashboardError> {
        let labels = import::parse_train_labels(text)?;
        let mut data = self.data.write().map_err(|_| DashboardError::LockPoisoned)?;
        data.train = labels;
        Ok(data.train.len())
    }

    /// Append uploaded books to the catalog. Returns the new entries.
    pub fn add_novels(&self, books: &[UploadedBook]) -> Result<Vec<Novel>, DashboardError> {
        let novels = import::catalog_books(books, chrono::Utc::now().timestamp_millis());
        let mut data = self.data.write().map_err(|_| DashboardError::LockPoisoned)?;
        data.novels.extend(novels.iter().cloned());
        tracing::info!(added = novels.len(), total = data.novels.len(), "Novels cataloged");
        Ok(novels)
    }

    // ── Run control ─────────────────────────────────────────

    /// Validate the input and claim the run slot.
    ///
    /// Split from [`Dashboard::execute`] so callers can report rejection
    /// synchronously and run the pipeline in the background.
    pub fn begin_run(&self) -> Result<RunClaim, DashboardError> {
        // Data before run slot, the same order progress updates take.
        let mut data = self.data.write().map_err(|_| DashboardError::LockPoisoned)?;
        let mut active = self
            .active_run
            .lock()
            .map_err(|_| DashboardError::LockPoisoned)?;
        if active.is_some() {
            return Err(DashboardError::AlreadyRunning);
        }
        if data.items.is_empty() {
            return Err(DashboardError::EmptyInput);
        }
        clear_results(&mut data.items);

        let generation = self.run_counter.fetch_add(1, Ordering::SeqCst) + 1;
        *active = Some(generation);
        tracing::info!(generation, items = data.items.len(), "Pipeline run claimed");
        Ok(RunClaim { generation })
    }

    fn holds_slot(&self, claim: RunClaim) -> bool {
        self.active_run
            .lock()
            .map(|a| *a == Some(claim.generation))
            .unwrap_or(false)
    }

    fn release(&self, claim: RunClaim) {
        if let Ok(mut active) = self.active_run.lock() {
            if *active == Some(claim.generation) {
                *active = None;
            }
        }
    }

    /// Drive a claimed run through every stage and classify all items.
    pub async fn execute(&self, claim: RunClaim) -> Result<RunSummary, DashboardError> {
        let result = self.drive(claim).await;
        self.release(claim);
        if let Err(e) = &result {
            tracing::warn!(generation = claim.generation, error = %e, "Pipeline run ended early");
        }
        result
    }

    async fn drive(&self, claim: RunClaim) -> Result<RunSummary, DashboardError> {
        let ticket = self.sequencer.run().await?;
        if !self.holds_slot(claim) {
            return Err(DashboardError::Cancelled);
        }

        let items = self.items()?;
        let outcome = self
            .evaluator
            .start(items, self.classifier.as_ref(), |progress| {
                self.apply_progress(claim, progress)
            })
            .await?;

        self.publish(PipelineEvent::BatchCompleted {
            item_count: outcome.items.len(),
            duration_ms: outcome.duration_ms,
        });
        self.sequencer.complete(ticket)?;

        Ok(RunSummary {
            item_count: outcome.items.len(),
            failures: outcome.failures,
            duration_ms: outcome.duration_ms,
        })
    }

    fn apply_progress(&self, claim: RunClaim, progress: EvaluationProgress<'_>) {
        match progress {
            EvaluationProgress::ItemStarted { index, item } => {
                self.publish(PipelineEvent::ItemStarted {
                    index,
                    id: item.id.clone(),
                });
            }
            EvaluationProgress::ItemResolved { index, item } => {
                let Ok(mut data) = self.data.write() else {
                    return;
                };
                // Checked under the data lock so a concurrent reset wins.
                if !self.holds_slot(claim) {
                    return;
                }
                if let Some(slot) = data.items.get_mut(index).filter(|s| s.id == item.id) {
                    slot.result = item.result.clone();
                }
                drop(data);
                self.publish(PipelineEvent::ItemResolved {
                    index,
                    item: item.clone(),
                });
            }
        }
    }

    /// Claim and execute in one call.
    pub async fn start(&self) -> Result<RunSummary, DashboardError> {
        let claim = self.begin_run()?;
        self.execute(claim).await
    }

    /// Abandon any run, clear results and training labels, and return to
    /// `Idle`. With demo data the sample catalog and items are restored.
    pub fn reset(&self) -> Result<(), DashboardError> {
        {
            // Same lock order as `begin_run`: no run can be claimed until the
            // sequencer is back at `Idle`.
            let mut data = self.data.write().map_err(|_| DashboardError::LockPoisoned)?;
            let mut active = self
                .active_run
                .lock()
                .map_err(|_| DashboardError::LockPoisoned)?;
            *active = None;
            self.evaluator.cancel();
            self.sequencer.reset();

            if self.demo_data {
                data.items = demo::demo_items();
                data.novels = demo::demo_novels();
            } else {
                clear_results(&mut data.items);
            }
            data.train.clear();
        }

        tracing::info!("Pipeline reset");
        self.publish(PipelineEvent::Reset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::pipeline::reasoning::StubClassifier;
    use crate::pipeline::types::{Prediction, Verdict};

    fn instant_dashboard(classifier: StubClassifier) -> Dashboard {
        Dashboard::with_demo_data(PipelineTiming::instant(), Arc::new(classifier))
    }

    fn drain(rx: &mut broadcast::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn three_item_run_reaches_complete() {
        let dashboard = instant_dashboard(StubClassifier::lexical());
        let mut rx = dashboard.subscribe_events();

        let summary = dashboard.start().await.unwrap();
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.failures, 0);

        let status = dashboard.status().unwrap();
        assert_eq!(status.stage, Stage::Complete);
        assert_eq!(status.processing_index, None);
        assert_eq!(status.resolved_count, 3);
        assert!(!status.running);

        let stages: Vec<Stage> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                PipelineEvent::StageChanged { stage } => Some(stage),
                _ => None,
            })
            .collect();
        assert_eq!(
            stages,
            vec![
                Stage::Ingestion,
                Stage::Chunking,
                Stage::Embedding,
                Stage::Clustering,
                Stage::Retrieval,
                Stage::Reasoning,
                Stage::Complete,
            ]
        );
    }

    #[tokio::test]
    async fn events_arrive_in_pipeline_order() {
        let dashboard = instant_dashboard(StubClassifier::fixed(Verdict::new(
            Prediction::Consistent,
            "ok",
        )));
        let mut rx = dashboard.subscribe_events();
        dashboard.start().await.unwrap();

        let kinds: Vec<String> = drain(&mut rx)
            .into_iter()
            .map(|e| match e {
                PipelineEvent::StageChanged { stage } => stage.as_str().to_string(),
                PipelineEvent::ItemStarted { index, .. } => format!("start {index}"),
                PipelineEvent::ItemResolved { index, .. } => format!("done {index}"),
                PipelineEvent::BatchCompleted { .. } => "batch".into(),
                PipelineEvent::Reset => "reset".into(),
            })
            .collect();

        assert_eq!(
            kinds,
            vec![
                "INGESTION", "CHUNKING", "EMBEDDING", "CLUSTERING", "RETRIEVAL", "REASONING",
                "start 0", "done 0", "start 1", "done 1", "start 2", "done 2", "batch",
                "COMPLETE",
            ]
        );
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let dashboard = Dashboard::new(PipelineTiming::instant(), Arc::new(StubClassifier::lexical()));
        assert!(matches!(
            dashboard.start().await,
            Err(DashboardError::EmptyInput)
        ));
        assert_eq!(dashboard.status().unwrap().stage, Stage::Idle);
        assert!(!dashboard.is_running());
    }

    #[tokio::test]
    async fn second_start_is_rejected_while_running() {
        let dashboard = instant_dashboard(StubClassifier::lexical());
        let claim = dashboard.begin_run().unwrap();
        assert!(matches!(
            dashboard.begin_run(),
            Err(DashboardError::AlreadyRunning)
        ));
        assert!(matches!(
            dashboard.upload_items_csv("id,claim\nx,y\n"),
            Err(DashboardError::AlreadyRunning)
        ));
        dashboard.execute(claim).await.unwrap();
        assert!(dashboard.begin_run().is_ok());
    }

    #[tokio::test]
    async fn failing_classifier_still_completes_with_defaults() {
        let dashboard = instant_dashboard(StubClassifier::failing());
        let summary = dashboard.start().await.unwrap();
        assert_eq!(summary.failures, 3);
        assert_eq!(dashboard.status().unwrap().stage, Stage::Complete);
        for item in dashboard.items().unwrap() {
            assert_eq!(item.result, Some(Verdict::error_default()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_run_abandons_everything() {
        let dashboard = Arc::new(Dashboard::with_demo_data(
            PipelineTiming::demo(),
            Arc::new(StubClassifier::lexical()),
        ));
        let mut rx = dashboard.subscribe_events();

        let handle = {
            let dashboard = Arc::clone(&dashboard);
            tokio::spawn(async move { dashboard.start().await })
        };

        // Connect delay (500ms) plus part of ingestion.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(dashboard.status().unwrap().stage, Stage::Ingestion);
        dashboard.reset().unwrap();

        assert!(matches!(
            handle.await.unwrap(),
            Err(DashboardError::Cancelled)
        ));
        tokio::time::sleep(Duration::from_secs(30)).await;

        let status = dashboard.status().unwrap();
        assert_eq!(status.stage, Stage::Idle);
        assert_eq!(status.resolved_count, 0);
        assert!(!status.running);

        let events = drain(&mut rx);
        assert!(matches!(events.last(), Some(PipelineEvent::Reset)));
        assert!(!events
            .iter()
            .any(|e| matches!(e, PipelineEvent::StageChanged { stage: Stage::Chunking })));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_reasoning_discards_pending_results() {
        let stub = StubClassifier::fixed(Verdict::new(Prediction::Consistent, "ok"))
            .with_delay(Duration::from_millis(500));
        let dashboard = Arc::new(Dashboard::with_demo_data(
            PipelineTiming::demo(),
            Arc::new(stub),
        ));

        let handle = {
            let dashboard = Arc::clone(&dashboard);
            tokio::spawn(async move { dashboard.start().await })
        };

        // Reasoning starts at 7700ms; item 0 resolves at 8200ms, item 1
        // starts after 1000ms of pacing.
        tokio::time::sleep(Duration::from_millis(9500)).await;
        let status = dashboard.status().unwrap();
        assert_eq!(status.stage, Stage::Reasoning);
        assert_eq!(status.resolved_count, 1);
        assert_eq!(status.processing_index, Some(1));

        dashboard.reset().unwrap();
        assert!(matches!(
            handle.await.unwrap(),
            Err(DashboardError::Cancelled)
        ));
        tokio::time::sleep(Duration::from_secs(10)).await;

        let status = dashboard.status().unwrap();
        assert_eq!(status.stage, Stage::Idle);
        assert_eq!(status.resolved_count, 0);
        assert_eq!(status.processing_index, None);
    }

    #[tokio::test]
    async fn reset_without_demo_data_keeps_items_but_clears_results() {
        let dashboard = Dashboard::new(
            PipelineTiming::instant(),
            Arc::new(StubClassifier::lexical()),
        );
        dashboard
            .upload_items_csv("id,char,content,context\nx1,Ann,Ann sailed home,Ann sailed home in June\n")
            .unwrap();
        dashboard.start().await.unwrap();
        assert_eq!(dashboard.status().unwrap().resolved_count, 1);

        dashboard.reset().unwrap();
        let items = dashboard.items().unwrap();
        assert_eq!(items.len(), 1);
        assert!(!items[0].has_result());
    }

    #[tokio::test]
    async fn reset_clears_training_labels() {
        for dashboard in [
            instant_dashboard(StubClassifier::lexical()),
            Dashboard::new(PipelineTiming::instant(), Arc::new(StubClassifier::lexical())),
        ] {
            if dashboard.items().unwrap().is_empty() {
                dashboard.upload_items_csv("id,char,content\nt1,Ann,c1\n").unwrap();
            }
            dashboard.upload_train_csv("id,label\nt1,1\n").unwrap();
            dashboard.start().await.unwrap();
            assert!(dashboard.stats().unwrap().reasoning_accuracy.is_some());

            dashboard.reset().unwrap();
            assert!(dashboard.train_labels().unwrap().is_empty());
            let stats = dashboard.stats().unwrap();
            assert_eq!(stats.train_label_count, 0);
            assert_eq!(stats.reasoning_accuracy, None);
        }
    }

    #[tokio::test]
    async fn item_upload_is_refused_once_a_run_is_claimed() {
        let dashboard = instant_dashboard(StubClassifier::lexical());
        let claim = dashboard.begin_run().unwrap();

        assert!(matches!(
            dashboard.upload_items_csv("id,char,content\nz,Zed,c\n"),
            Err(DashboardError::AlreadyRunning)
        ));
        assert!(matches!(
            dashboard.replace_items(Vec::new()),
            Err(DashboardError::AlreadyRunning)
        ));
        assert_eq!(dashboard.items().unwrap().len(), 3);

        dashboard.execute(claim).await.unwrap();
        assert_eq!(dashboard.status().unwrap().stage, Stage::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn run_started_right_after_reset_moves_strictly_forward() {
        let dashboard = Arc::new(Dashboard::with_demo_data(
            PipelineTiming::demo(),
            Arc::new(StubClassifier::lexical()),
        ));
        let mut rx = dashboard.subscribe_events();

        let stale = {
            let dashboard = Arc::clone(&dashboard);
            tokio::spawn(async move { dashboard.start().await })
        };
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(dashboard.status().unwrap().stage, Stage::Ingestion);

        dashboard.reset().unwrap();
        // The old run is still parked in its ingestion sleep here.
        let summary = dashboard.start().await.unwrap();
        assert_eq!(summary.item_count, 3);
        assert!(matches!(
            stale.await.unwrap(),
            Err(DashboardError::Cancelled)
        ));
        assert_eq!(dashboard.status().unwrap().stage, Stage::Complete);

        let events = drain(&mut rx);
        let after_reset = events
            .iter()
            .position(|e| matches!(e, PipelineEvent::Reset))
            .unwrap();
        let stages: Vec<Stage> = events[after_reset..]
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::StageChanged { stage } => Some(*stage),
                _ => None,
            })
            .collect();
        assert_eq!(
            stages,
            vec![
                Stage::Ingestion,
                Stage::Chunking,
                Stage::Embedding,
                Stage::Clustering,
                Stage::Retrieval,
                Stage::Reasoning,
                Stage::Complete,
            ]
        );
    }

    #[tokio::test]
    async fn uploads_feed_stats_and_export() {
        let dashboard = Dashboard::new(
            PipelineTiming::instant(),
            Arc::new(StubClassifier::fixed(Verdict::new(Prediction::Consistent, "fits"))),
        );
        dashboard
            .upload_items_csv("id,char,content\na,Ann,c1\nb,Bob,c2\n")
            .unwrap();
        dashboard.upload_train_csv("id,label\na,1\nb,0\n").unwrap();
        let added = dashboard
            .add_novels(&[UploadedBook {
                file_name: "Book.txt".into(),
                size_bytes: 5000,
            }])
            .unwrap();
        assert_eq!(added[0].chunk_count, 3);

        assert_eq!(dashboard.stats().unwrap().reasoning_accuracy, None);
        dashboard.start().await.unwrap();

        let stats = dashboard.stats().unwrap();
        assert_eq!(stats.novel_count, 1);
        assert_eq!(stats.character_count, 2);
        assert_eq!(stats.embedding_count, 3);
        assert_eq!(stats.reasoning_accuracy, Some(50.0));

        assert_eq!(
            dashboard.export_csv().unwrap(),
            "id,Prediction,Rationale\na,1,\"fits\"\nb,1,\"fits\""
        );
    }
}
