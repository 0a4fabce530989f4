//! Exercise session - one detector fed from a landmark stream
//!
//! Owns the whole per-frame pipeline for a single exercise:
//! joint selection → angle → visibility gate → stabilizer → detector.
//! A session is created per exercise and discarded at the end; nothing
//! is shared between sessions.

use serde::{Deserialize, Serialize};

use super::calibration::ExerciseCalibration;
use super::catalog::{find_exercise, ExerciseDefinition};
use super::detector::{DetectorKind, MotionSample, RepPhase, RepUpdate, RepetitionDetector};
use super::feedback::FeedbackKey;
use crate::error::{CoachError, Result};
use crate::physics::{
    joint_visibility, landmark_angle, AngleStabilizer, ConfidenceGate, DEFAULT_VISIBILITY_THRESHOLD,
    DEFAULT_WINDOW,
};
use crate::pose::{JointTriple, Landmark};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub stabilizer_window: usize,
    pub visibility_threshold: f32,
    /// Use landmark depth for joint angles when the detector provides it
    pub use_depth: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stabilizer_window: DEFAULT_WINDOW,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            use_depth: false,
        }
    }
}

/// Per-frame output handed to the presentation layer
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameFeedback {
    pub phase: RepPhase,
    pub rep_count: u32,
    pub counted: bool,
    /// Accuracy of the rep counted on this frame
    pub accuracy: Option<f32>,
    /// Mean accuracy over the set so far
    pub set_accuracy: Option<f32>,
    pub progress: f32,
    /// Stabilized joint angle in degrees
    pub angle: Option<f32>,
    pub feedback: FeedbackKey,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummary {
    pub exercise_id: String,
    pub rep_count: u32,
    pub average_accuracy: Option<f32>,
    pub duration_seconds: f64,
    pub frames_processed: u64,
    pub calibration: Option<ExerciseCalibration>,
}

pub struct ExerciseSession {
    definition: &'static ExerciseDefinition,
    config: SessionConfig,
    detector: RepetitionDetector,
    stabilizer: AngleStabilizer,
    gate: ConfidenceGate,
    active: bool,
    first_timestamp: Option<f64>,
    last_timestamp: Option<f64>,
    frames_processed: u64,
    last_angle: Option<f32>,
    last_feedback: FeedbackKey,
}

impl ExerciseSession {
    pub fn new(exercise_id: &str) -> Result<Self> {
        Self::with_config(exercise_id, SessionConfig::default())
    }

    pub fn with_config(exercise_id: &str, config: SessionConfig) -> Result<Self> {
        let definition =
            find_exercise(exercise_id).ok_or_else(|| CoachError::UnknownExercise(exercise_id.to_string()))?;
        Ok(Self::from_definition(definition, definition.calibration, config))
    }

    /// Start with a stored or user-recorded calibration instead of the default
    pub fn with_calibration(exercise_id: &str, calibration: ExerciseCalibration) -> Result<Self> {
        let definition =
            find_exercise(exercise_id).ok_or_else(|| CoachError::UnknownExercise(exercise_id.to_string()))?;
        let calibration = calibration.validated(&definition.calibration);
        Ok(Self::from_definition(definition, calibration, SessionConfig::default()))
    }

    fn from_definition(
        definition: &'static ExerciseDefinition,
        calibration: ExerciseCalibration,
        config: SessionConfig,
    ) -> Self {
        log::info!("exercise session started: {}", definition.id);
        Self {
            definition,
            config,
            detector: RepetitionDetector::new(definition.detector, calibration),
            stabilizer: AngleStabilizer::new(config.stabilizer_window),
            gate: ConfidenceGate::with_threshold(config.visibility_threshold),
            active: true,
            first_timestamp: None,
            last_timestamp: None,
            frames_processed: 0,
            last_angle: None,
            last_feedback: FeedbackKey::GetReady,
        }
    }

    pub fn exercise_id(&self) -> &'static str {
        self.definition.id
    }

    pub fn definition(&self) -> &'static ExerciseDefinition {
        self.definition
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn rep_count(&self) -> u32 {
        self.detector.rep_count()
    }

    pub fn calibration(&self) -> Option<ExerciseCalibration> {
        self.detector.calibration()
    }

    /// Replace the calibration; the rep count is kept
    pub fn set_calibration(&mut self, calibration: ExerciseCalibration) {
        self.detector.set_config(calibration);
    }

    /// Feed one detector frame taken at `timestamp` seconds
    ///
    /// Frames after `stop`, out-of-order timestamps and frames shorter than
    /// the schema leave the state untouched.
    pub fn process_frame(&mut self, landmarks: &[Landmark], timestamp: f64) -> FrameFeedback {
        if !self.active {
            return self.idle(self.last_feedback);
        }
        if landmarks.len() < self.definition.schema.landmark_count() {
            log::debug!(
                "{}: short frame ({} landmarks), skipping",
                self.definition.id,
                landmarks.len()
            );
            return self.idle(FeedbackKey::NotVisible);
        }
        if !timestamp.is_finite() || self.last_timestamp.is_some_and(|last| timestamp <= last) {
            log::trace!("{}: dropping out-of-order frame at {}", self.definition.id, timestamp);
            return self.idle(self.last_feedback);
        }
        self.last_timestamp = Some(timestamp);
        self.first_timestamp.get_or_insert(timestamp);
        self.frames_processed += 1;

        let angle = match self.definition.detector {
            DetectorKind::Touch => None,
            _ => self.measure_angle(landmarks),
        };
        self.last_angle = angle;

        let update = self.detector.update(&MotionSample {
            angle,
            landmarks,
            timestamp,
        });
        self.last_feedback = update.feedback;
        self.feedback_from(update)
    }

    /// Stabilized angle of the most visible candidate joint
    fn measure_angle(&mut self, landmarks: &[Landmark]) -> Option<f32> {
        let (joint, visibility) = self.select_joint(landmarks)?;
        let measured = landmark_angle(landmarks, joint, 0.0, self.config.use_depth);
        let accepted = measured.is_some() && visibility >= self.gate.threshold();
        let gated = self.gate.apply(measured, visibility);

        if accepted {
            gated.map(|a| self.stabilizer.stabilize(a))
        } else {
            // Hold the last smoothed value through dropouts
            self.stabilizer.current().or(gated)
        }
    }

    fn select_joint(&self, landmarks: &[Landmark]) -> Option<(JointTriple, f32)> {
        let mut best: Option<(JointTriple, f32)> = None;
        for &joint in self.definition.joints {
            let visibility = joint_visibility(landmarks, joint);
            // Strict comparison: ties keep the first (left) side
            if best.map_or(true, |(_, v)| visibility > v) {
                best = Some((joint, visibility));
            }
        }
        best
    }

    fn idle(&self, feedback: FeedbackKey) -> FrameFeedback {
        self.feedback_from(self.detector.snapshot(feedback))
    }

    fn feedback_from(&self, update: RepUpdate) -> FrameFeedback {
        FrameFeedback {
            phase: update.phase,
            rep_count: update.rep_count,
            counted: update.counted,
            accuracy: update.accuracy,
            set_accuracy: self.detector.set_accuracy(),
            progress: update.progress,
            angle: self.last_angle,
            feedback: update.feedback,
        }
    }

    /// Zero the set and start over; calibration is kept
    pub fn reset(&mut self) {
        self.detector.reset();
        self.stabilizer.reset();
        self.gate.reset();
        self.active = true;
        self.first_timestamp = None;
        self.last_timestamp = None;
        self.frames_processed = 0;
        self.last_angle = None;
        self.last_feedback = FeedbackKey::GetReady;
        log::info!("exercise session reset: {}", self.definition.id);
    }

    /// Halt frame ingestion immediately
    pub fn stop(&mut self) {
        if self.active {
            log::info!("exercise session stopped: {}", self.definition.id);
        }
        self.active = false;
    }

    /// Stop and summarise the set
    pub fn end_session(&mut self) -> ExerciseSummary {
        self.stop();
        let duration_seconds = match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };
        let summary = ExerciseSummary {
            exercise_id: self.definition.id.to_string(),
            rep_count: self.detector.rep_count(),
            average_accuracy: self.detector.set_accuracy(),
            duration_seconds,
            frames_processed: self.frames_processed,
            calibration: self.detector.calibration(),
        };
        log::info!(
            "exercise session ended: {} reps of {} in {:.1}s",
            summary.rep_count,
            summary.exercise_id,
            summary.duration_seconds
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, POSE_LANDMARK_COUNT, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE};

    /// Standing pose with both knees bent to `knee_angle` degrees
    fn pose(knee_angle: f32) -> Vec<Landmark> {
        let mut lm = vec![Landmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
        let theta = knee_angle.to_radians();
        for (hip, knee, ankle, x) in [(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, 0.45), (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, 0.55)] {
            lm[hip] = Landmark::new(x, 0.4);
            lm[knee] = Landmark::new(x, 0.6);
            lm[ankle] = Landmark::new(x + 0.2 * theta.sin(), 0.6 - 0.2 * theta.cos());
        }
        lm
    }

    fn feed(session: &mut ExerciseSession, trace: &[f32], t0: f64) -> (Vec<FrameFeedback>, f64) {
        let mut out = Vec::new();
        let mut t = t0;
        for &angle in trace {
            // Hold each angle long enough for the stabilizer window to fill
            for _ in 0..6 {
                out.push(session.process_frame(&pose(angle), t));
                t += 1.0 / 30.0;
            }
        }
        (out, t)
    }

    const SQUAT: [f32; 9] = [170.0, 150.0, 120.0, 95.0, 90.0, 110.0, 140.0, 161.0, 170.0];

    #[test]
    fn test_squat_trace_counts_one_rep() {
        let mut session = ExerciseSession::new("squat").unwrap();
        let (frames, _) = feed(&mut session, &SQUAT, 0.0);
        let counted: Vec<_> = frames.iter().filter(|f| f.counted).collect();
        assert_eq!(counted.len(), 1);
        assert!(counted[0].accuracy.unwrap() > 90.0);
        assert_eq!(session.rep_count(), 1);
    }

    #[test]
    fn test_angle_is_reported() {
        let mut session = ExerciseSession::new("squat").unwrap();
        let (frames, _) = feed(&mut session, &[120.0], 0.0);
        let angle = frames.last().unwrap().angle.unwrap();
        assert!((angle - 120.0).abs() < 0.01);
    }

    #[test]
    fn test_short_frame_is_no_op() {
        let mut session = ExerciseSession::new("squat").unwrap();
        let fb = session.process_frame(&[Landmark::default(); 10], 0.0);
        assert_eq!(fb.feedback, FeedbackKey::NotVisible);
        assert_eq!(fb.rep_count, 0);
        assert_eq!(session.end_session().frames_processed, 0);
    }

    #[test]
    fn test_out_of_order_frames_ignored() {
        let mut session = ExerciseSession::new("squat").unwrap();
        session.process_frame(&pose(170.0), 1.0);
        session.process_frame(&pose(90.0), 0.5);
        session.process_frame(&pose(90.0), 1.0);
        assert_eq!(session.end_session().frames_processed, 1);
    }

    #[test]
    fn test_stop_halts_ingestion() {
        let mut session = ExerciseSession::new("squat").unwrap();
        let (_, t) = feed(&mut session, &SQUAT[..5], 0.0);
        session.stop();
        feed(&mut session, &SQUAT[5..], t);
        assert_eq!(session.rep_count(), 0);
        assert!(!session.is_active());
    }

    #[test]
    fn test_reset_matches_fresh_session() {
        let mut session = ExerciseSession::new("squat").unwrap();
        feed(&mut session, &SQUAT, 0.0);
        session.reset();
        let (frames, _) = feed(&mut session, &SQUAT, 0.0);
        let mut fresh = ExerciseSession::new("squat").unwrap();
        let (expected, _) = feed(&mut fresh, &SQUAT, 0.0);
        assert_eq!(frames, expected);
    }

    #[test]
    fn test_unknown_exercise() {
        assert!(matches!(
            ExerciseSession::new("burpee"),
            Err(CoachError::UnknownExercise(id)) if id == "burpee"
        ));
    }

    #[test]
    fn test_calibration_survives_set_config() {
        let mut session = ExerciseSession::new("bicep_curl").unwrap();
        let cal = ExerciseCalibration::new(150.0, 50.0, 130.0);
        session.set_calibration(cal);
        assert_eq!(session.calibration(), Some(cal));

        let summary = session.end_session();
        assert_eq!(summary.exercise_id, "bicep_curl");
        assert_eq!(summary.calibration, Some(cal));
    }

    #[test]
    fn test_config_deserializes_partially() {
        let config: SessionConfig = serde_json::from_str(r#"{"useDepth":true}"#).unwrap();
        assert!(config.use_depth);
        assert_eq!(config.stabilizer_window, DEFAULT_WINDOW);
    }
}
