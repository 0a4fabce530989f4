//! Exercise module - repetition counting from joint angles
//!
//! Organized into submodules:
//! - calibration: start/target/threshold ranges and the recording flow
//! - counter: angle-based rep state machine
//! - hold: timed holds (plank, wall sit, grip squeeze)
//! - touch: thumb opposition sequence
//! - detector: one enum over the three behaviour families
//! - catalog: exercise id → definition lookup table
//! - session: per-frame pipeline for one exercise
//! - store: calibration persistence

mod calibration;
mod catalog;
mod counter;
mod detector;
mod feedback;
mod hold;
mod session;
mod store;
mod touch;

pub use calibration::{CalibrationRecorder, CalibrationStage, ExerciseCalibration};
pub use catalog::{exercise_ids, find_exercise, ExerciseDefinition, EXERCISES};
pub use counter::{rep_accuracy, RepCounter};
pub use detector::{DetectorKind, MotionSample, RepPhase, RepUpdate, RepetitionDetector};
pub use feedback::FeedbackKey;
pub use hold::HoldTimer;
pub use session::{ExerciseSession, ExerciseSummary, FrameFeedback, SessionConfig};
pub use store::{CalibrationStore, KeyValueStore, MemoryStore};
pub use touch::TouchSequenceCounter;
