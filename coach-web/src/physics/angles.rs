//! Joint angle calculation using dot product
//!
//! Angle at the vertex between vectors vertex→proximal and vertex→distal.
//! 180° = fully extended (straight line), 0° = fully folded.

use nalgebra::{SVector, Vector2, Vector3};

use crate::pose::{JointTriple, Landmark};

/// Vectors shorter than this are treated as a missing landmark
pub const DEGENERATE_EPSILON: f32 = 0.0001;

/// Returned by [`calculate_angle`] when the geometry is degenerate
pub const DEGENERATE_ANGLE: f32 = 0.0;

/// cos(θ) = (v1 · v2) / (|v1| × |v2|), or None if either vector is ~zero
fn included_angle<const D: usize>(v1: SVector<f32, D>, v2: SVector<f32, D>) -> Option<f32> {
    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if !(mag1 >= DEGENERATE_EPSILON && mag2 >= DEGENERATE_EPSILON) {
        return None;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Planar joint angle in degrees [0, 180], None when degenerate
pub fn joint_angle(a: (f32, f32), vertex: (f32, f32), b: (f32, f32)) -> Option<f32> {
    let v1 = Vector2::new(a.0 - vertex.0, a.1 - vertex.1);
    let v2 = Vector2::new(b.0 - vertex.0, b.1 - vertex.1);
    included_angle(v1, v2)
}

/// Depth-aware joint angle in degrees [0, 180], None when degenerate
pub fn joint_angle_3d(a: (f32, f32, f32), vertex: (f32, f32, f32), b: (f32, f32, f32)) -> Option<f32> {
    let v1 = Vector3::new(a.0 - vertex.0, a.1 - vertex.1, a.2 - vertex.2);
    let v2 = Vector3::new(b.0 - vertex.0, b.1 - vertex.1, b.2 - vertex.2);
    included_angle(v1, v2)
}

/// Planar joint angle with the [`DEGENERATE_ANGLE`] sentinel instead of None
pub fn calculate_angle(a: (f32, f32), vertex: (f32, f32), b: (f32, f32)) -> f32 {
    joint_angle(a, vertex, b).unwrap_or(DEGENERATE_ANGLE)
}

/// Angle of a joint triple in a landmark frame
///
/// None when an index is out of range, a landmark is below
/// `visibility_threshold`, or the geometry is degenerate.
pub fn landmark_angle(
    landmarks: &[Landmark],
    joint: JointTriple,
    visibility_threshold: f32,
    use_depth: bool,
) -> Option<f32> {
    let a = landmarks.get(joint.proximal)?;
    let v = landmarks.get(joint.vertex)?;
    let b = landmarks.get(joint.distal)?;

    if ![a, v, b].iter().all(|lm| lm.is_visible(visibility_threshold)) {
        return None;
    }

    if use_depth && a.z.is_some() && v.z.is_some() && b.z.is_some() {
        joint_angle_3d(a.xyz(), v.xyz(), b.xyz())
    } else {
        joint_angle(a.xy(), v.xy(), b.xy())
    }
}

/// Weakest visibility among the three landmarks of a joint (0 if any is missing)
pub fn joint_visibility(landmarks: &[Landmark], joint: JointTriple) -> f32 {
    joint
        .indices()
        .iter()
        .map(|&i| landmarks.get(i).map_or(0.0, |lm| lm.confidence()))
        .fold(1.0, f32::min)
}

/// Inclination of the segment `from → to` away from vertical, in degrees [0, 180]
pub fn inclination_from_vertical(from: (f32, f32), to: (f32, f32)) -> Option<f32> {
    // Image y grows downward, so "up" is (0, -1)
    let up = Vector2::new(0.0, -1.0);
    let segment = Vector2::new(to.0 - from.0, to.1 - from.1);
    included_angle(up, segment)
}
