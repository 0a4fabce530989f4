//! Exercise calibration - the joint excursion that counts as one repetition
//!
//! Works for flexion (start > target) and extension (start < target)
//! movements alike: everything is measured as excursion from the start
//! angle toward the target.

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};

/// Smallest start→target range accepted (degrees)
pub const MIN_RANGE: f32 = 5.0;

/// Target counts as reached within this share of the range...
pub const TARGET_TOLERANCE_RATIO: f32 = 0.1;
/// ...but never tighter than this (degrees)
pub const MIN_TARGET_TOLERANCE: f32 = 3.0;

/// Threshold placed at this share of the range when derived or repaired
pub const DEFAULT_THRESHOLD_RATIO: f32 = 0.2;

/// Recorded calibrations target this share of the furthest sampled excursion
pub const RECORDED_TARGET_RATIO: f32 = 0.9;

/// Samples needed per stage of a calibration recording
pub const MIN_CALIBRATION_SAMPLES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCalibration {
    pub start_angle: f32,
    pub target_angle: f32,
    pub completion_threshold: f32,
}

impl ExerciseCalibration {
    /// Generic knee/elbow flexion range used when nothing better is known
    pub const DEFAULT: ExerciseCalibration = ExerciseCalibration::new(170.0, 90.0, 160.0);

    pub const fn new(start_angle: f32, target_angle: f32, completion_threshold: f32) -> Self {
        Self {
            start_angle,
            target_angle,
            completion_threshold,
        }
    }

    /// Absolute start→target distance in degrees
    pub fn range(&self) -> f32 {
        (self.target_angle - self.start_angle).abs()
    }

    /// +1 when the target angle is above the start angle, -1 otherwise
    pub fn direction(&self) -> f32 {
        if self.target_angle >= self.start_angle {
            1.0
        } else {
            -1.0
        }
    }

    /// Signed distance from start toward target (0 at start, `range()` at target)
    pub fn excursion(&self, angle: f32) -> f32 {
        (angle - self.start_angle) * self.direction()
    }

    pub fn threshold_excursion(&self) -> f32 {
        self.excursion(self.completion_threshold)
    }

    pub fn target_tolerance(&self) -> f32 {
        (self.range() * TARGET_TOLERANCE_RATIO).max(MIN_TARGET_TOLERANCE)
    }

    /// At or beyond the target, within tolerance
    pub fn target_reached(&self, angle: f32) -> bool {
        self.excursion(angle) >= self.range() - self.target_tolerance()
    }

    /// How far toward the target the angle is, 0-100
    pub fn progress(&self, angle: f32) -> f32 {
        let range = self.range();
        if !(range >= MIN_RANGE) || !angle.is_finite() {
            return 0.0;
        }
        (self.excursion(angle) / range).clamp(0.0, 1.0) * 100.0
    }

    pub fn is_valid(&self) -> bool {
        let finite = self.start_angle.is_finite()
            && self.target_angle.is_finite()
            && self.completion_threshold.is_finite();
        if !finite || self.range() < MIN_RANGE {
            return false;
        }
        let t = self.threshold_excursion();
        t > 0.0 && t < self.range()
    }

    /// A calibration safe to divide by
    ///
    /// Angles are clamped to [0, 180]. Non-finite values or a range under
    /// [`MIN_RANGE`] fall back to `fallback`; a threshold outside the
    /// start→target interval is moved to [`DEFAULT_THRESHOLD_RATIO`] of the range.
    pub fn validated(&self, fallback: &ExerciseCalibration) -> ExerciseCalibration {
        let finite = self.start_angle.is_finite()
            && self.target_angle.is_finite()
            && self.completion_threshold.is_finite();

        let clamped = ExerciseCalibration::new(
            self.start_angle.clamp(0.0, 180.0),
            self.target_angle.clamp(0.0, 180.0),
            self.completion_threshold.clamp(0.0, 180.0),
        );

        if !finite || clamped.range() < MIN_RANGE {
            log::warn!("calibration {:?} unusable, falling back to {:?}", self, fallback);
            return if fallback.is_valid() {
                *fallback
            } else {
                ExerciseCalibration::DEFAULT
            };
        }

        if clamped.is_valid() {
            return clamped;
        }

        let threshold = clamped.start_angle
            + clamped.direction() * clamped.range() * DEFAULT_THRESHOLD_RATIO;
        ExerciseCalibration {
            completion_threshold: threshold,
            ..clamped
        }
    }
}

impl Default for ExerciseCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Which part of the calibration flow samples go to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationStage {
    /// User holds the start pose
    StartPose,
    /// User performs a few full repetitions
    Reps,
}

/// User calibration flow: captured start pose + sampled rep angles
pub struct CalibrationRecorder {
    stage: CalibrationStage,
    start_samples: Vec<f32>,
    rep_samples: Vec<f32>,
}

impl CalibrationRecorder {
    pub fn new() -> Self {
        Self {
            stage: CalibrationStage::StartPose,
            start_samples: Vec::new(),
            rep_samples: Vec::new(),
        }
    }

    pub fn stage(&self) -> CalibrationStage {
        self.stage
    }

    /// Switch from start-pose capture to rep sampling
    pub fn begin_reps(&mut self) {
        self.stage = CalibrationStage::Reps;
    }

    /// Record one angle sample into the current stage; non-finite samples are dropped
    pub fn record(&mut self, angle: f32) {
        if !angle.is_finite() {
            return;
        }
        match self.stage {
            CalibrationStage::StartPose => self.start_samples.push(angle),
            CalibrationStage::Reps => self.rep_samples.push(angle),
        }
    }

    /// Derive start/target/threshold from the recorded samples
    pub fn finish(&self) -> Result<ExerciseCalibration> {
        if self.start_samples.len() < MIN_CALIBRATION_SAMPLES {
            return Err(CoachError::InsufficientCalibrationSamples {
                stage: "start pose",
                needed: MIN_CALIBRATION_SAMPLES,
                got: self.start_samples.len(),
            });
        }
        if self.rep_samples.len() < MIN_CALIBRATION_SAMPLES {
            return Err(CoachError::InsufficientCalibrationSamples {
                stage: "repetition",
                needed: MIN_CALIBRATION_SAMPLES,
                got: self.rep_samples.len(),
            });
        }

        let start = self.start_samples.iter().sum::<f32>() / self.start_samples.len() as f32;
        let furthest = self
            .rep_samples
            .iter()
            .copied()
            .fold(start, |best, s| if (s - start).abs() > (best - start).abs() { s } else { best });

        let direction = if furthest >= start { 1.0 } else { -1.0 };
        let range = (furthest - start).abs() * RECORDED_TARGET_RATIO;
        if range < MIN_RANGE {
            return Err(CoachError::CalibrationRangeTooSmall(range));
        }

        let calibration = ExerciseCalibration::new(
            start.clamp(0.0, 180.0),
            (start + direction * range).clamp(0.0, 180.0),
            (start + direction * range * DEFAULT_THRESHOLD_RATIO).clamp(0.0, 180.0),
        );
        log::info!("calibration recorded: {:?}", calibration);
        Ok(calibration)
    }

    pub fn clear(&mut self) {
        self.stage = CalibrationStage::StartPose;
        self.start_samples.clear();
        self.rep_samples.clear();
    }
}

impl Default for CalibrationRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexion_excursion() {
        let cal = ExerciseCalibration::new(170.0, 90.0, 160.0);
        assert_eq!(cal.range(), 80.0);
        assert_eq!(cal.excursion(170.0), 0.0);
        assert_eq!(cal.excursion(90.0), 80.0);
        assert_eq!(cal.threshold_excursion(), 10.0);
        assert!(cal.target_reached(95.0));
        assert!(!cal.target_reached(120.0));
        assert!(cal.is_valid());
    }

    #[test]
    fn test_extension_excursion() {
        let cal = ExerciseCalibration::new(90.0, 165.0, 105.0);
        assert_eq!(cal.direction(), 1.0);
        assert_eq!(cal.excursion(165.0), 75.0);
        assert!(cal.target_reached(160.0));
        assert!(cal.is_valid());
    }

    #[test]
    fn test_progress_bounds() {
        let cal = ExerciseCalibration::new(170.0, 90.0, 160.0);
        assert_eq!(cal.progress(170.0), 0.0);
        assert_eq!(cal.progress(130.0), 50.0);
        assert_eq!(cal.progress(60.0), 100.0);
        assert_eq!(cal.progress(179.0), 0.0);
        assert_eq!(cal.progress(f32::NAN), 0.0);
    }

    #[test]
    fn test_zero_range_falls_back() {
        let broken = ExerciseCalibration::new(120.0, 120.0, 120.0);
        let fallback = ExerciseCalibration::new(160.0, 45.0, 140.0);
        assert!(!broken.is_valid());
        assert_eq!(broken.validated(&fallback), fallback);
        assert_eq!(broken.progress(100.0), 0.0);

        let nan = ExerciseCalibration::new(f32::NAN, 90.0, 160.0);
        assert_eq!(nan.validated(&fallback), fallback);
    }

    #[test]
    fn test_bad_threshold_is_repaired() {
        let cal = ExerciseCalibration::new(170.0, 90.0, 60.0).validated(&ExerciseCalibration::DEFAULT);
        assert_eq!(cal.start_angle, 170.0);
        assert_eq!(cal.target_angle, 90.0);
        assert!((cal.completion_threshold - 154.0).abs() < 1e-4);
        assert!(cal.is_valid());
    }

    #[test]
    fn test_angles_clamped() {
        let cal = ExerciseCalibration::new(200.0, 90.0, 170.0).validated(&ExerciseCalibration::DEFAULT);
        assert_eq!(cal.start_angle, 180.0);
        assert!(cal.is_valid());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&ExerciseCalibration::DEFAULT).unwrap();
        assert!(json.contains("\"startAngle\""));
        assert!(json.contains("\"targetAngle\""));
        assert!(json.contains("\"completionThreshold\""));
    }

    #[test]
    fn test_recorder_derives_range() {
        let mut rec = CalibrationRecorder::new();
        for a in [168.0, 170.0, 172.0, 170.0, 170.0] {
            rec.record(a);
        }
        rec.begin_reps();
        for a in [160.0, 120.0, 80.0, 70.0, 110.0, 150.0, 169.0] {
            rec.record(a);
        }
        let cal = rec.finish().unwrap();
        assert_eq!(cal.start_angle, 170.0);
        // 90% of the 100° excursion
        assert!((cal.target_angle - 80.0).abs() < 1e-3);
        assert!((cal.completion_threshold - 152.0).abs() < 1e-3);
        assert!(cal.is_valid());
    }

    #[test]
    fn test_recorder_needs_samples() {
        let mut rec = CalibrationRecorder::new();
        rec.record(170.0);
        assert!(matches!(
            rec.finish(),
            Err(CoachError::InsufficientCalibrationSamples { got: 1, .. })
        ));
    }

    #[test]
    fn test_recorder_rejects_tiny_range() {
        let mut rec = CalibrationRecorder::new();
        for _ in 0..5 {
            rec.record(170.0);
        }
        rec.begin_reps();
        for _ in 0..5 {
            rec.record(168.0);
        }
        assert!(matches!(rec.finish(), Err(CoachError::CalibrationRangeTooSmall(_))));
    }
}
