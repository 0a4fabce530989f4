//! Browser tests for the JS bindings
//! Run with: wasm-pack test --headless --firefox

#![cfg(target_arch = "wasm32")]

use coach_web::bridge::{ExerciseSessionHandle, GaitSession, PostureFeatures};
use coach_web::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn standing_pose() -> Vec<f32> {
    let mut data = vec![0.5f32; 33 * 4];
    for i in 0..33 {
        data[i * 4 + 3] = 1.0;
    }
    data
}

#[wasm_bindgen_test]
fn test_version() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
}

#[wasm_bindgen_test]
fn test_exercise_ids() {
    let ids = exercise_ids();
    assert!(ids.length() >= 11);
}

#[wasm_bindgen_test]
fn test_calculate_angle() {
    let angle = calculate_angle(1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    assert!((angle - 90.0).abs() < 1e-3);
}

#[wasm_bindgen_test]
fn test_exercise_session_rejects_bad_frames() {
    let mut session = ExerciseSessionHandle::new("squat").unwrap();
    assert!(session.process_pose(&[0.0; 10], 0.0).is_err());
    assert!(session.process_hand(&[0.0; 63], 0.0).is_err());
    assert!(session.process_pose(&standing_pose(), 0.0).is_ok());
    assert!(ExerciseSessionHandle::new("moonwalk").is_err());
}

#[wasm_bindgen_test]
fn test_gait_session_defaults() {
    let mut session = GaitSession::new(JsValue::UNDEFINED).unwrap();
    assert!(session.process_frame(&standing_pose(), 0.0).is_ok());
    assert_eq!(session.frame_count(), 1);
    assert!(session.generate_analysis_result().is_ok());
}

#[wasm_bindgen_test]
fn test_posture_window() {
    let mut features = PostureFeatures::new("angles", 2).unwrap();
    features.push(&standing_pose()).unwrap();
    assert!(features.buffer().is_none());
    features.push(&standing_pose()).unwrap();
    assert!(features.is_ready());
    assert_eq!(features.buffer().unwrap().len(), 20);
    assert!(PostureFeatures::new("pixels", 2).is_err());
    assert_eq!(PostureFeatures::new("hybrid", 0).unwrap().feature_count(), 58);
}
