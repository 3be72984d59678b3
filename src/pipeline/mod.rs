pub mod stage;
pub mod types;
pub mod sequencer; // Stage progression + observers
pub mod evaluator; // Sequential per-item classification
pub mod reasoning;
pub mod import; // CSV uploads → items / labels / novels
pub mod export;
pub mod demo;
pub mod stats;

pub use evaluator::{BatchOutcome, ConsistencyEvaluator, EvaluationProgress, EvaluatorError};
pub use sequencer::{RunTicket, SequencerError, StageSequencer, Subscription};
pub use stage::{Stage, StageStatus, StageView};
pub use types::{Novel, PipelineEvent, Prediction, TrainLabel, Verdict, VerificationItem};
