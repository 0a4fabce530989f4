//! Repetition detector - one shape per behaviour family
//!
//! Angle-based reps, timed holds and touch sequences share one per-frame
//! contract so a session can drive any of them.

use serde::Serialize;

use super::calibration::ExerciseCalibration;
use super::counter::RepCounter;
use super::feedback::FeedbackKey;
use super::hold::HoldTimer;
use super::touch::TouchSequenceCounter;
use crate::pose::Landmark;

/// State-machine phase reported to the presentation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    WaitingForStart,
    MovingToTarget,
    AtTarget,
    ReturningToStart,
    Holding,
    InSequence,
}

/// Result of feeding one frame to a detector
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepUpdate {
    pub phase: RepPhase,
    pub rep_count: u32,
    /// A repetition was completed on this frame
    pub counted: bool,
    /// Form accuracy (0-100) of the repetition completed on this frame
    pub accuracy: Option<f32>,
    /// Progress through the current repetition (0-100)
    pub progress: f32,
    pub feedback: FeedbackKey,
}

/// Which detector an exercise uses
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DetectorKind {
    /// Start → target → start joint excursion
    Angle,
    /// Stay at the target for `seconds`
    Hold { seconds: f32 },
    /// Thumb touches fingertips in order
    Touch,
}

/// Per-frame input for a detector
#[derive(Clone, Copy, Debug)]
pub struct MotionSample<'a> {
    /// Stabilized joint angle, None when the joint is not measurable
    pub angle: Option<f32>,
    pub landmarks: &'a [Landmark],
    /// Seconds, strictly increasing within a session
    pub timestamp: f64,
}

pub enum RepetitionDetector {
    Angle(RepCounter),
    Hold(HoldTimer),
    Touch(TouchSequenceCounter),
}

impl RepetitionDetector {
    pub fn new(kind: DetectorKind, calibration: ExerciseCalibration) -> Self {
        match kind {
            DetectorKind::Angle => RepetitionDetector::Angle(RepCounter::new(calibration)),
            DetectorKind::Hold { seconds } => {
                RepetitionDetector::Hold(HoldTimer::new(calibration, seconds as f64))
            }
            DetectorKind::Touch => RepetitionDetector::Touch(TouchSequenceCounter::new()),
        }
    }

    pub fn update(&mut self, sample: &MotionSample<'_>) -> RepUpdate {
        match self {
            RepetitionDetector::Angle(counter) => match sample.angle {
                Some(angle) => counter.update(angle, sample.timestamp),
                None => counter.snapshot(FeedbackKey::NotVisible),
            },
            RepetitionDetector::Hold(timer) => match sample.angle {
                Some(angle) => timer.update(angle, sample.timestamp),
                None => timer.snapshot(FeedbackKey::NotVisible),
            },
            RepetitionDetector::Touch(touch) => touch.update(sample.landmarks, sample.timestamp),
        }
    }

    /// Current state without feeding a frame
    pub fn snapshot(&self, feedback: FeedbackKey) -> RepUpdate {
        match self {
            RepetitionDetector::Angle(counter) => counter.snapshot(feedback),
            RepetitionDetector::Hold(timer) => timer.snapshot(feedback),
            RepetitionDetector::Touch(touch) => touch.snapshot(feedback),
        }
    }

    /// Replace the calibration; the rep count is kept
    pub fn set_config(&mut self, calibration: ExerciseCalibration) {
        match self {
            RepetitionDetector::Angle(counter) => counter.set_config(calibration),
            RepetitionDetector::Hold(timer) => timer.set_config(calibration),
            RepetitionDetector::Touch(_) => {}
        }
    }

    /// None for detectors that do not use a joint angle
    pub fn calibration(&self) -> Option<ExerciseCalibration> {
        match self {
            RepetitionDetector::Angle(counter) => Some(counter.calibration()),
            RepetitionDetector::Hold(timer) => Some(timer.calibration()),
            RepetitionDetector::Touch(_) => None,
        }
    }

    pub fn rep_count(&self) -> u32 {
        match self {
            RepetitionDetector::Angle(counter) => counter.rep_count(),
            RepetitionDetector::Hold(timer) => timer.rep_count(),
            RepetitionDetector::Touch(touch) => touch.rep_count(),
        }
    }

    /// Mean accuracy over the completed repetitions
    pub fn set_accuracy(&self) -> Option<f32> {
        match self {
            RepetitionDetector::Angle(counter) => counter.set_accuracy(),
            RepetitionDetector::Hold(timer) => timer.set_accuracy(),
            RepetitionDetector::Touch(touch) => touch.set_accuracy(),
        }
    }

    /// Zero the count and return to waiting; calibration is kept
    pub fn reset(&mut self) {
        match self {
            RepetitionDetector::Angle(counter) => counter.reset(),
            RepetitionDetector::Hold(timer) => timer.reset(),
            RepetitionDetector::Touch(touch) => touch.reset(),
        }
    }
}

/// Running mean of per-rep accuracies
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct AccuracyTally {
    sum: f32,
    count: u32,
}

impl AccuracyTally {
    pub(crate) fn add(&mut self, accuracy: f32) {
        self.sum += accuracy;
        self.count += 1;
    }

    pub(crate) fn mean(&self) -> Option<f32> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f32)
        }
    }
}
