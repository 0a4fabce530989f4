//! Physics module - joint geometry and per-frame signal conditioning
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod stabilizer;
mod one_euro;
mod velocity;
mod confidence_gate;

pub use angles::{
    calculate_angle, joint_angle, joint_angle_3d, landmark_angle, joint_visibility,
    inclination_from_vertical, DEGENERATE_ANGLE, DEGENERATE_EPSILON,
};
pub use stabilizer::{AngleStabilizer, Smoothing, DEFAULT_WINDOW};
pub use one_euro::{OneEuroFilter, OneEuroParams};
pub use velocity::{VelocityTracker, VELOCITY_FRAMES};
pub use confidence_gate::{ConfidenceGate, DEFAULT_VISIBILITY_THRESHOLD};
