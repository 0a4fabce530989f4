//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod exercise;
mod gait;
mod posture;
mod storage;

use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::error::CoachError;

pub use landmarks::parse_landmarks;
pub use exercise::ExerciseSessionHandle;
pub use gait::GaitSession;
pub use posture::PostureFeatures;
pub use storage::LocalStorage;

/// Plain JS objects with `null` for missing values
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|err| CoachError::from(err).into())
}
