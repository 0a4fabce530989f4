//! ExerciseSession class for JavaScript
//!
//! Wraps the native session; landmark frames arrive as flat Float32Arrays
//! and feedback goes back as plain objects.

use wasm_bindgen::prelude::*;

use super::landmarks::parse_landmarks;
use super::storage::LocalStorage;
use super::to_js;
use crate::error::CoachError;
use crate::exercise::{CalibrationStore, ExerciseCalibration, ExerciseSession, SessionConfig};
use crate::pose::BodySchema;

#[wasm_bindgen(js_name = ExerciseSession)]
pub struct ExerciseSessionHandle {
    inner: ExerciseSession,
}

impl ExerciseSessionHandle {
    fn process(&mut self, data: &[f32], timestamp: f64, schema: BodySchema) -> Result<JsValue, JsValue> {
        let definition = self.inner.definition();
        if definition.schema != schema {
            return Err(CoachError::SchemaMismatch {
                exercise: definition.id,
                expected: definition.schema,
            }
            .into());
        }
        let landmarks = parse_landmarks(data, schema.landmark_count())?;
        to_js(&self.inner.process_frame(&landmarks, timestamp))
    }
}

#[wasm_bindgen(js_class = ExerciseSession)]
impl ExerciseSessionHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(exercise_id: &str) -> Result<ExerciseSessionHandle, JsValue> {
        Ok(Self {
            inner: ExerciseSession::new(exercise_id)?,
        })
    }

    /// `config` may be undefined or a partial SessionConfig object
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(exercise_id: &str, config: JsValue) -> Result<ExerciseSessionHandle, JsValue> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(CoachError::from)?
        };
        Ok(Self {
            inner: ExerciseSession::with_config(exercise_id, config)?,
        })
    }

    #[wasm_bindgen(js_name = withCalibration)]
    pub fn with_calibration(
        exercise_id: &str,
        start_angle: f32,
        target_angle: f32,
        completion_threshold: f32,
    ) -> Result<ExerciseSessionHandle, JsValue> {
        let calibration = ExerciseCalibration::new(start_angle, target_angle, completion_threshold);
        Ok(Self {
            inner: ExerciseSession::with_calibration(exercise_id, calibration)?,
        })
    }

    #[wasm_bindgen(getter, js_name = exerciseId)]
    pub fn exercise_id(&self) -> String {
        self.inner.exercise_id().to_string()
    }

    #[wasm_bindgen(getter, js_name = repCount)]
    pub fn rep_count(&self) -> u32 {
        self.inner.rep_count()
    }

    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// 33 body landmarks, stride 3 or 4; `timestamp` in seconds
    /// (`performance.now() / 1000`)
    #[wasm_bindgen(js_name = processPose)]
    pub fn process_pose(&mut self, data: &[f32], timestamp: f64) -> Result<JsValue, JsValue> {
        self.process(data, timestamp, BodySchema::Pose)
    }

    /// 21 hand landmarks, stride 3 or 4; `timestamp` in seconds
    #[wasm_bindgen(js_name = processHand)]
    pub fn process_hand(&mut self, data: &[f32], timestamp: f64) -> Result<JsValue, JsValue> {
        self.process(data, timestamp, BodySchema::Hand)
    }

    /// Replace the calibration without losing the rep count
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, start_angle: f32, target_angle: f32, completion_threshold: f32) {
        self.inner
            .set_calibration(ExerciseCalibration::new(start_angle, target_angle, completion_threshold));
    }

    pub fn calibration(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.calibration())
    }

    /// Apply the calibration stored for this exercise; false when none is stored
    #[wasm_bindgen(js_name = loadCalibration)]
    pub fn load_calibration(&mut self) -> Result<bool, JsValue> {
        let store = CalibrationStore::new(LocalStorage::new()?);
        match store.load(self.inner.exercise_id())? {
            Some(calibration) => {
                self.inner.set_calibration(calibration);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[wasm_bindgen(js_name = saveCalibration)]
    pub fn save_calibration(&self) -> Result<bool, JsValue> {
        let Some(calibration) = self.inner.calibration() else {
            return Ok(false);
        };
        let mut store = CalibrationStore::new(LocalStorage::new()?);
        store.save(self.inner.exercise_id(), &calibration)?;
        Ok(true)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    #[wasm_bindgen(js_name = endSession)]
    pub fn end_session(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.end_session())
    }
}
