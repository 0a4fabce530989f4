//! Hold timer - "stay at the target for N seconds" repetitions
//!
//! Used for plank, wall sit and grip squeeze. Reaching the target starts
//! the clock; holding it for the full duration counts one repetition.
//! Breaks shorter than [`BREAK_GRACE_SECONDS`] do not reset the clock.

use super::calibration::ExerciseCalibration;
use super::detector::{AccuracyTally, RepPhase, RepUpdate};
use super::feedback::FeedbackKey;

/// Leaving position for less than this is tolerated (seconds)
pub const BREAK_GRACE_SECONDS: f64 = 0.5;

pub struct HoldTimer {
    calibration: ExerciseCalibration,
    hold_seconds: f64,
    phase: RepPhase,
    rep_count: u32,
    /// Seconds spent in position during the current hold
    held: f64,
    /// When the subject last left position, if currently out of it
    broken_since: Option<f64>,
    last_timestamp: Option<f64>,
    deviation_sum: f32,
    deviation_samples: u32,
    accuracy: AccuracyTally,
}

impl HoldTimer {
    pub fn new(calibration: ExerciseCalibration, hold_seconds: f64) -> Self {
        let hold_seconds = if hold_seconds.is_finite() && hold_seconds > 0.0 {
            hold_seconds
        } else {
            1.0
        };
        Self {
            calibration: calibration.validated(&ExerciseCalibration::DEFAULT),
            hold_seconds,
            phase: RepPhase::WaitingForStart,
            rep_count: 0,
            held: 0.0,
            broken_since: None,
            last_timestamp: None,
            deviation_sum: 0.0,
            deviation_samples: 0,
            accuracy: AccuracyTally::default(),
        }
    }

    pub fn calibration(&self) -> ExerciseCalibration {
        self.calibration
    }

    pub fn hold_seconds(&self) -> f64 {
        self.hold_seconds
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn set_accuracy(&self) -> Option<f32> {
        self.accuracy.mean()
    }

    /// Seconds held in the current attempt
    pub fn held_seconds(&self) -> f64 {
        self.held
    }

    pub fn set_config(&mut self, calibration: ExerciseCalibration) {
        self.calibration = calibration.validated(&self.calibration);
        self.start_waiting();
    }

    pub fn update(&mut self, angle: f32, timestamp: f64) -> RepUpdate {
        if !angle.is_finite() || !timestamp.is_finite() {
            return self.snapshot(FeedbackKey::NotVisible);
        }
        let dt = match self.last_timestamp {
            Some(last) if timestamp <= last => {
                return self.snapshot(FeedbackKey::HoldPosition);
            }
            Some(last) => timestamp - last,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp);

        let cal = self.calibration;
        let in_position = cal.target_reached(angle);
        let mut accuracy = None;

        let feedback = match self.phase {
            RepPhase::Holding => {
                if in_position {
                    self.broken_since = None;
                    self.held += dt;
                    self.deviation_sum += (angle - cal.target_angle).abs();
                    self.deviation_samples += 1;

                    if self.held >= self.hold_seconds {
                        let score = self.complete_hold();
                        accuracy = Some(score);
                        FeedbackKey::HoldComplete
                    } else {
                        FeedbackKey::HoldPosition
                    }
                } else {
                    let since = *self.broken_since.get_or_insert(timestamp);
                    if timestamp - since > BREAK_GRACE_SECONDS {
                        log::debug!("hold broken after {:.1}s", self.held);
                        self.start_waiting();
                        FeedbackKey::HoldBroken
                    } else {
                        FeedbackKey::HoldPosition
                    }
                }
            }
            // Completed: must leave position before the next hold
            RepPhase::ReturningToStart => {
                if cal.excursion(angle) <= cal.threshold_excursion() {
                    self.start_waiting();
                    FeedbackKey::GetReady
                } else {
                    FeedbackKey::HoldComplete
                }
            }
            _ => {
                if in_position {
                    self.phase = RepPhase::Holding;
                    self.held = 0.0;
                    self.broken_since = None;
                    self.deviation_sum = (angle - cal.target_angle).abs();
                    self.deviation_samples = 1;
                    FeedbackKey::HoldPosition
                } else {
                    self.phase = RepPhase::WaitingForStart;
                    FeedbackKey::GetReady
                }
            }
        };

        RepUpdate {
            phase: self.phase,
            rep_count: self.rep_count,
            counted: accuracy.is_some(),
            accuracy,
            progress: self.progress(),
            feedback,
        }
    }

    fn complete_hold(&mut self) -> f32 {
        let mean_deviation = self.deviation_sum / self.deviation_samples.max(1) as f32;
        let scale = 2.0 * self.calibration.target_tolerance();
        let score = (1.0 - mean_deviation / scale).clamp(0.0, 1.0) * 100.0;

        self.rep_count += 1;
        self.accuracy.add(score);
        self.phase = RepPhase::ReturningToStart;
        log::debug!("hold {} complete: accuracy {:.0}%", self.rep_count, score);
        score
    }

    fn start_waiting(&mut self) {
        self.phase = RepPhase::WaitingForStart;
        self.held = 0.0;
        self.broken_since = None;
        self.deviation_sum = 0.0;
        self.deviation_samples = 0;
    }

    fn progress(&self) -> f32 {
        match self.phase {
            RepPhase::ReturningToStart => 100.0,
            _ => ((self.held / self.hold_seconds).clamp(0.0, 1.0) * 100.0) as f32,
        }
    }

    pub fn snapshot(&self, feedback: FeedbackKey) -> RepUpdate {
        RepUpdate {
            phase: self.phase,
            rep_count: self.rep_count,
            counted: false,
            accuracy: None,
            progress: self.progress(),
            feedback,
        }
    }

    pub fn reset(&mut self) {
        *self = HoldTimer::new(self.calibration, self.hold_seconds);
    }
}
