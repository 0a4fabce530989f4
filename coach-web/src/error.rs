//! Crate error type
//!
//! Only construction, calibration, persistence and parsing can fail.
//! Per-frame processing degrades to empty results instead.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::pose::BodySchema;

pub type Result<T> = std::result::Result<T, CoachError>;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("invalid landmark data length: {len} (expected {expected} landmarks with stride 3 or 4)")]
    InvalidLandmarkData { len: usize, expected: usize },

    #[error("unknown exercise id: {0}")]
    UnknownExercise(String),

    #[error("exercise {exercise} expects {expected:?} landmarks")]
    SchemaMismatch {
        exercise: &'static str,
        expected: BodySchema,
    },

    #[error("unknown feature setting: {0}")]
    UnknownFeatureSetting(String),

    #[error("calibration needs {needed} {stage} samples, got {got}")]
    InsufficientCalibrationSamples {
        stage: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("calibration range too small: {0:.1}°")]
    CalibrationRangeTooSmall(f32),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("js conversion error: {0}")]
    JsConversion(String),
}

impl From<serde_wasm_bindgen::Error> for CoachError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        CoachError::JsConversion(err.to_string())
    }
}

impl From<CoachError> for JsValue {
    fn from(err: CoachError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
