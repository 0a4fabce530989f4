//! Coach Web - landmark-stream signal processing for fitness coaching
//!
//! JavaScript owns the camera, the pose/hand model and the UI. This crate
//! turns each frame of landmarks into joint angles, rep counts and gait
//! measurements:
//! - `physics`: joint angles, stabilizer, filters
//! - `exercise`: calibrated rep counting per exercise
//! - `gait`: walking cycle detection and analysis reports
//! - `classifier`: feature windows for the posture model
//! - `bridge`: wasm_bindgen classes that delegate to the above

pub mod bridge;
pub mod classifier;
pub mod error;
pub mod exercise;
pub mod gait;
pub mod physics;
pub mod pose;

use wasm_bindgen::prelude::*;

pub use error::CoachError;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Route `log` records to the browser console
///
/// `level` is one of "error", "warn", "info", "debug", "trace";
/// anything else means "info".
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "error" => log::Level::Error,
        "warn" => log::Level::Warn,
        "debug" => log::Level::Debug,
        "trace" => log::Level::Trace,
        _ => log::Level::Info,
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("coach-web {} logging at {}", env!("CARGO_PKG_VERSION"), level);
}

#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[wasm_bindgen(js_name = exerciseIds)]
pub fn exercise_ids() -> js_sys::Array {
    exercise::exercise_ids().into_iter().map(JsValue::from).collect()
}

/// Angle at (bx, by) in degrees, 0 when degenerate
#[wasm_bindgen(js_name = calculateAngle)]
pub fn calculate_angle(ax: f32, ay: f32, bx: f32, by: f32, cx: f32, cy: f32) -> f32 {
    physics::calculate_angle((ax, ay), (bx, by), (cx, cy))
}
