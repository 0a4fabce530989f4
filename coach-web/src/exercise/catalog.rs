//! Exercise catalog - static lookup table keyed by exercise id

use super::calibration::ExerciseCalibration;
use super::detector::DetectorKind;
use crate::pose::{
    BodySchema, JointTriple, INDEX_PIP_JOINT, LEFT_BODY_LINE, LEFT_ELBOW_JOINT, LEFT_KNEE_JOINT,
    LEFT_SHOULDER_JOINT, MIDDLE_PIP_JOINT, RIGHT_BODY_LINE, RIGHT_ELBOW_JOINT, RIGHT_KNEE_JOINT,
    RIGHT_SHOULDER_JOINT,
};

/// Everything needed to build a session for one exercise
#[derive(Clone, Copy, Debug)]
pub struct ExerciseDefinition {
    pub id: &'static str,
    pub schema: BodySchema,
    /// Candidate joints; the most visible one is measured each frame
    pub joints: &'static [JointTriple],
    pub detector: DetectorKind,
    pub calibration: ExerciseCalibration,
}

const KNEES: &[JointTriple] = &[LEFT_KNEE_JOINT, RIGHT_KNEE_JOINT];
const ELBOWS: &[JointTriple] = &[LEFT_ELBOW_JOINT, RIGHT_ELBOW_JOINT];
const SHOULDERS: &[JointTriple] = &[LEFT_SHOULDER_JOINT, RIGHT_SHOULDER_JOINT];
const BODY_LINES: &[JointTriple] = &[LEFT_BODY_LINE, RIGHT_BODY_LINE];
const FINGERS: &[JointTriple] = &[INDEX_PIP_JOINT, MIDDLE_PIP_JOINT];

pub static EXERCISES: &[ExerciseDefinition] = &[
    ExerciseDefinition {
        id: "squat",
        schema: BodySchema::Pose,
        joints: KNEES,
        detector: DetectorKind::Angle,
        calibration: ExerciseCalibration::new(170.0, 90.0, 160.0),
    },
    ExerciseDefinition {
        id: "lunge",
        schema: BodySchema::Pose,
        joints: KNEES,
        detector: DetectorKind::Angle,
        calibration: ExerciseCalibration::new(170.0, 100.0, 155.0),
    },
    ExerciseDefinition {
        id: "push_up",
        schema: BodySchema::Pose,
        joints: ELBOWS,
        detector: DetectorKind::Angle,
        calibration: ExerciseCalibration::new(165.0, 90.0, 150.0),
    },
    ExerciseDefinition {
        id: "bicep_curl",
        schema: BodySchema::Pose,
        joints: ELBOWS,
        detector: DetectorKind::Angle,
        calibration: ExerciseCalibration::new(160.0, 45.0, 140.0),
    },
    // Extension: the elbow opens toward the target
    ExerciseDefinition {
        id: "shoulder_press",
        schema: BodySchema::Pose,
        joints: ELBOWS,
        detector: DetectorKind::Angle,
        calibration: ExerciseCalibration::new(90.0, 165.0, 105.0),
    },
    ExerciseDefinition {
        id: "lateral_raise",
        schema: BodySchema::Pose,
        joints: SHOULDERS,
        detector: DetectorKind::Angle,
        calibration: ExerciseCalibration::new(20.0, 90.0, 35.0),
    },
    ExerciseDefinition {
        id: "plank",
        schema: BodySchema::Pose,
        joints: BODY_LINES,
        detector: DetectorKind::Hold { seconds: 30.0 },
        calibration: ExerciseCalibration::new(140.0, 175.0, 150.0),
    },
    ExerciseDefinition {
        id: "wall_sit",
        schema: BodySchema::Pose,
        joints: KNEES,
        detector: DetectorKind::Hold { seconds: 30.0 },
        calibration: ExerciseCalibration::new(170.0, 90.0, 150.0),
    },
    ExerciseDefinition {
        id: "finger_flexion",
        schema: BodySchema::Hand,
        joints: FINGERS,
        detector: DetectorKind::Angle,
        calibration: ExerciseCalibration::new(175.0, 100.0, 160.0),
    },
    ExerciseDefinition {
        id: "grip_squeeze",
        schema: BodySchema::Hand,
        joints: FINGERS,
        detector: DetectorKind::Hold { seconds: 3.0 },
        calibration: ExerciseCalibration::new(170.0, 90.0, 150.0),
    },
    ExerciseDefinition {
        id: "finger_touch",
        schema: BodySchema::Hand,
        joints: &[],
        detector: DetectorKind::Touch,
        calibration: ExerciseCalibration::DEFAULT,
    },
];

pub fn find_exercise(id: &str) -> Option<&'static ExerciseDefinition> {
    EXERCISES.iter().find(|def| def.id == id)
}

pub fn exercise_ids() -> Vec<&'static str> {
    EXERCISES.iter().map(|def| def.id).collect()
}
