//! Angle-based repetition counter
//!
//! waiting_for_start → moving_to_target → at_target → returning_to_start → (count)
//!
//! A rep is counted only when the angle comes back past the completion
//! threshold after the target was reached, so jitter near either boundary
//! can never count the same excursion twice.

use super::calibration::ExerciseCalibration;
use super::detector::{AccuracyTally, RepPhase, RepUpdate};
use super::feedback::FeedbackKey;

/// Arming needs the angle this far past the threshold (degrees)
pub const ARM_HYSTERESIS: f32 = 2.0;

/// Reps faster than this lose tempo score
pub const MIN_REP_SECONDS: f64 = 1.0;

const DEPTH_WEIGHT: f32 = 0.8;
const TEMPO_WEIGHT: f32 = 0.2;

pub struct RepCounter {
    calibration: ExerciseCalibration,
    phase: RepPhase,
    rep_count: u32,
    /// Furthest excursion reached during the current rep
    peak_excursion: f32,
    /// When the current rep was armed
    rep_started_at: f64,
    last_timestamp: Option<f64>,
    last_progress: f32,
    accuracy: AccuracyTally,
}

impl RepCounter {
    pub fn new(calibration: ExerciseCalibration) -> Self {
        Self {
            calibration: calibration.validated(&ExerciseCalibration::DEFAULT),
            phase: RepPhase::WaitingForStart,
            rep_count: 0,
            peak_excursion: 0.0,
            rep_started_at: 0.0,
            last_timestamp: None,
            last_progress: 0.0,
            accuracy: AccuracyTally::default(),
        }
    }

    pub fn calibration(&self) -> ExerciseCalibration {
        self.calibration
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn set_accuracy(&self) -> Option<f32> {
        self.accuracy.mean()
    }

    /// Replace start/target/threshold atomically
    ///
    /// The count survives; an excursion in progress is abandoned since it
    /// was measured against the old range. An unusable calibration keeps
    /// the current one.
    pub fn set_config(&mut self, calibration: ExerciseCalibration) {
        self.calibration = calibration.validated(&self.calibration);
        self.phase = RepPhase::WaitingForStart;
        self.peak_excursion = 0.0;
    }

    /// Feed one angle sample taken at `timestamp` seconds
    ///
    /// Out-of-order timestamps and non-finite input leave the state untouched.
    pub fn update(&mut self, angle: f32, timestamp: f64) -> RepUpdate {
        if !angle.is_finite() || !timestamp.is_finite() {
            return self.snapshot(FeedbackKey::NotVisible);
        }
        if let Some(last) = self.last_timestamp {
            if timestamp <= last {
                log::trace!("rep counter: dropping out-of-order frame at {}", timestamp);
                return self.snapshot(self.idle_feedback());
            }
        }
        self.last_timestamp = Some(timestamp);

        let cal = self.calibration;
        let excursion = cal.excursion(angle);
        let threshold = cal.threshold_excursion();
        let mut accuracy = None;

        let feedback = match self.phase {
            RepPhase::WaitingForStart => {
                if excursion > threshold + ARM_HYSTERESIS {
                    self.phase = RepPhase::MovingToTarget;
                    self.peak_excursion = excursion;
                    self.rep_started_at = timestamp;
                    if cal.target_reached(angle) {
                        self.phase = RepPhase::AtTarget;
                        FeedbackKey::TargetReached
                    } else {
                        FeedbackKey::KeepGoing
                    }
                } else {
                    FeedbackKey::GetReady
                }
            }
            RepPhase::MovingToTarget => {
                self.peak_excursion = self.peak_excursion.max(excursion);
                if cal.target_reached(angle) {
                    self.phase = RepPhase::AtTarget;
                    FeedbackKey::TargetReached
                } else if excursion <= threshold {
                    log::debug!(
                        "partial rep: peak {:.1}° of {:.1}°",
                        self.peak_excursion,
                        cal.range()
                    );
                    self.phase = RepPhase::WaitingForStart;
                    self.peak_excursion = 0.0;
                    FeedbackKey::NotDeepEnough
                } else {
                    FeedbackKey::KeepGoing
                }
            }
            RepPhase::AtTarget | RepPhase::ReturningToStart => {
                self.peak_excursion = self.peak_excursion.max(excursion);
                if excursion <= threshold {
                    let score = self.complete_rep(timestamp);
                    accuracy = Some(score);
                    if timestamp - self.rep_started_at < MIN_REP_SECONDS {
                        FeedbackKey::TooFast
                    } else {
                        FeedbackKey::RepCounted
                    }
                } else if cal.target_reached(angle) {
                    self.phase = RepPhase::AtTarget;
                    FeedbackKey::TargetReached
                } else {
                    self.phase = RepPhase::ReturningToStart;
                    FeedbackKey::ReturnToStart
                }
            }
            // Phases owned by other detectors
            RepPhase::Holding | RepPhase::InSequence => {
                self.phase = RepPhase::WaitingForStart;
                FeedbackKey::GetReady
            }
        };

        self.last_progress = cal.progress(angle);

        RepUpdate {
            phase: self.phase,
            rep_count: self.rep_count,
            counted: accuracy.is_some(),
            accuracy,
            progress: self.last_progress,
            feedback,
        }
    }

    fn complete_rep(&mut self, timestamp: f64) -> f32 {
        let duration = timestamp - self.rep_started_at;
        let score = rep_accuracy(&self.calibration, self.peak_excursion, duration);

        self.rep_count += 1;
        self.accuracy.add(score);
        self.phase = RepPhase::WaitingForStart;
        self.peak_excursion = 0.0;

        log::debug!(
            "rep {} counted: accuracy {:.0}%, {:.2}s",
            self.rep_count,
            score,
            duration
        );
        score
    }

    fn idle_feedback(&self) -> FeedbackKey {
        match self.phase {
            RepPhase::WaitingForStart => FeedbackKey::GetReady,
            RepPhase::MovingToTarget => FeedbackKey::KeepGoing,
            RepPhase::AtTarget => FeedbackKey::TargetReached,
            _ => FeedbackKey::ReturnToStart,
        }
    }

    /// Current state without consuming a sample
    pub fn snapshot(&self, feedback: FeedbackKey) -> RepUpdate {
        RepUpdate {
            phase: self.phase,
            rep_count: self.rep_count,
            counted: false,
            accuracy: None,
            progress: self.last_progress,
            feedback,
        }
    }

    /// Zero the count and return to waiting; calibration is kept
    pub fn reset(&mut self) {
        *self = RepCounter::new(self.calibration);
    }
}

/// Form accuracy 0-100 for one repetition
///
/// Depth: 100 minus the relative deviation of the reached excursion from
/// the calibrated range. Tempo: full marks at [`MIN_REP_SECONDS`] or slower.
pub fn rep_accuracy(calibration: &ExerciseCalibration, peak_excursion: f32, duration: f64) -> f32 {
    let range = calibration.range();
    let depth = if range > 0.0 {
        (1.0 - (peak_excursion - range).abs() / range).clamp(0.0, 1.0) * 100.0
    } else {
        0.0
    };
    let tempo = (duration / MIN_REP_SECONDS).clamp(0.0, 1.0) as f32 * 100.0;
    DEPTH_WEIGHT * depth + TEMPO_WEIGHT * tempo
}
