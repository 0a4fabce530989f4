//! Posture classifier support
//!
//! Note: model inference runs in JavaScript. Rust maps pose frames onto
//! the 24-keypoint schema the model was trained on, extracts features,
//! and keeps the rolling sequence window fed to the model.

mod buffer;
mod features;
mod keypoints;

pub use buffer::{FeatureBuffer, DEFAULT_SEQUENCE_LENGTH};
pub use features::{
    extract_features, joint_angles, normalize_coordinates, FeatureSet, Normalization, ANGLE_FEATURES,
    COORDINATE_FEATURES, HYBRID_FEATURES,
};
pub use keypoints::{to_keypoints, Keypoint, KEYPOINT_COUNT};
