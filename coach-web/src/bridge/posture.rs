//! PostureFeatures class - feature window for the JS sequence model
//!
//! JS pushes each pose frame, then runs inference on `buffer()` once
//! the window is full.

use wasm_bindgen::prelude::*;

use super::landmarks::parse_landmarks;
use crate::classifier::{extract_features, FeatureBuffer, FeatureSet, Normalization, DEFAULT_SEQUENCE_LENGTH};
use crate::error::CoachError;
use crate::physics::DEFAULT_VISIBILITY_THRESHOLD;
use crate::pose::POSE_LANDMARK_COUNT;

#[wasm_bindgen]
pub struct PostureFeatures {
    set: FeatureSet,
    normalization: Normalization,
    buffer: FeatureBuffer,
}

#[wasm_bindgen]
impl PostureFeatures {
    /// `feature_set` is "coordinates", "angles" or "hybrid";
    /// a sequence length of 0 uses the default window
    #[wasm_bindgen(constructor)]
    pub fn new(feature_set: &str, sequence_length: usize) -> Result<PostureFeatures, JsValue> {
        let set = FeatureSet::from_name(feature_set)
            .ok_or_else(|| CoachError::UnknownFeatureSetting(feature_set.to_string()))?;
        let capacity = if sequence_length == 0 {
            DEFAULT_SEQUENCE_LENGTH
        } else {
            sequence_length
        };
        Ok(Self {
            set,
            normalization: Normalization::default(),
            buffer: FeatureBuffer::new(capacity, set.len()),
        })
    }

    /// "bbox" or "hip_center"; clears the window
    #[wasm_bindgen(js_name = setNormalization)]
    pub fn set_normalization(&mut self, name: &str) -> Result<(), JsValue> {
        self.normalization = Normalization::from_name(name)
            .ok_or_else(|| CoachError::UnknownFeatureSetting(name.to_string()))?;
        self.buffer.clear();
        Ok(())
    }

    /// Extract one frame of features into the window
    pub fn push(&mut self, data: &[f32]) -> Result<(), JsValue> {
        let landmarks = parse_landmarks(data, POSE_LANDMARK_COUNT)?;
        let features = extract_features(&landmarks, self.set, self.normalization, DEFAULT_VISIBILITY_THRESHOLD)?;
        self.buffer.push(&features);
        Ok(())
    }

    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.buffer.is_ready()
    }

    #[wasm_bindgen(getter, js_name = frameCount)]
    pub fn frame_count(&self) -> usize {
        self.buffer.frame_count()
    }

    #[wasm_bindgen(getter, js_name = featureCount)]
    pub fn feature_count(&self) -> usize {
        self.buffer.width()
    }

    /// Window oldest frame first, or undefined until it is full
    pub fn buffer(&self) -> Option<Vec<f32>> {
        if self.buffer.is_ready() {
            Some(self.buffer.as_flat())
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
