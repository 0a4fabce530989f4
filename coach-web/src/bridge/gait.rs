//! GaitSession class for JavaScript

use wasm_bindgen::prelude::*;

use super::landmarks::parse_landmarks;
use super::to_js;
use crate::error::CoachError;
use crate::gait::{GaitAnalyzer, GaitConfig};
use crate::pose::POSE_LANDMARK_COUNT;

#[wasm_bindgen]
pub struct GaitSession {
    analyzer: GaitAnalyzer,
}

#[wasm_bindgen]
impl GaitSession {
    /// `config` may be undefined or a partial GaitConfig object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<GaitSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            GaitConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(CoachError::from)?
        };
        Ok(Self {
            analyzer: GaitAnalyzer::new(config),
        })
    }

    #[wasm_bindgen(getter, js_name = frameCount)]
    pub fn frame_count(&self) -> usize {
        self.analyzer.frame_count()
    }

    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.analyzer.is_active()
    }

    /// 33 body landmarks, stride 3 or 4; `timestamp` in seconds
    /// (`performance.now() / 1000`)
    #[wasm_bindgen(js_name = processFrame)]
    pub fn process_frame(&mut self, data: &[f32], timestamp: f64) -> Result<JsValue, JsValue> {
        let landmarks = parse_landmarks(data, POSE_LANDMARK_COUNT)?;
        to_js(&self.analyzer.process_frame(&landmarks, timestamp))
    }

    #[wasm_bindgen(js_name = generateAnalysisResult)]
    pub fn generate_analysis_result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.analyzer.generate_analysis_result(js_sys::Date::now()))
    }

    #[wasm_bindgen(js_name = recentFrames)]
    pub fn recent_frames(&self, n: usize) -> Result<JsValue, JsValue> {
        to_js(&self.analyzer.recent_frames(n))
    }

    pub fn reset(&mut self) {
        self.analyzer.reset();
    }

    pub fn stop(&mut self) {
        self.analyzer.stop();
    }
}
