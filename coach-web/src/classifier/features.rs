//! Feature extraction for posture classification
//!
//! Produces per-frame feature vectors over the 24-keypoint schema:
//! normalized coordinates, joint angles, or both.

use super::keypoints::{
    to_keypoints, Keypoint, KEYPOINT_COUNT, KP_LEFT_ANKLE, KP_LEFT_ELBOW, KP_LEFT_HIP, KP_LEFT_KNEE,
    KP_LEFT_SHOULDER, KP_LEFT_WRIST, KP_NECK, KP_RIGHT_ANKLE, KP_RIGHT_ELBOW, KP_RIGHT_HIP, KP_RIGHT_KNEE,
    KP_RIGHT_SHOULDER, KP_RIGHT_WRIST, KP_WAIST,
};
use crate::error::{CoachError, Result};
use crate::physics::joint_angle;
use crate::pose::{Landmark, POSE_LANDMARK_COUNT};

/// x, y per keypoint
pub const COORDINATE_FEATURES: usize = KEYPOINT_COUNT * 2;

/// Joint angles per frame
pub const ANGLE_FEATURES: usize = 10;

pub const HYBRID_FEATURES: usize = COORDINATE_FEATURES + ANGLE_FEATURES;

/// Hip widths below this are treated as 1 to avoid blowing up the scale
const MIN_HIP_WIDTH: f32 = 1e-6;

/// (proximal, vertex, distal) keypoints of each angle feature
const ANGLE_TRIPLES: [(usize, usize, usize); ANGLE_FEATURES] = [
    (KP_LEFT_HIP, KP_LEFT_KNEE, KP_LEFT_ANKLE),
    (KP_RIGHT_HIP, KP_RIGHT_KNEE, KP_RIGHT_ANKLE),
    (KP_LEFT_SHOULDER, KP_LEFT_ELBOW, KP_LEFT_WRIST),
    (KP_RIGHT_SHOULDER, KP_RIGHT_ELBOW, KP_RIGHT_WRIST),
    (KP_LEFT_ELBOW, KP_LEFT_SHOULDER, KP_LEFT_HIP),
    (KP_RIGHT_ELBOW, KP_RIGHT_SHOULDER, KP_RIGHT_HIP),
    (KP_LEFT_SHOULDER, KP_LEFT_HIP, KP_LEFT_KNEE),
    (KP_RIGHT_SHOULDER, KP_RIGHT_HIP, KP_RIGHT_KNEE),
    (KP_LEFT_SHOULDER, KP_NECK, KP_RIGHT_SHOULDER),
    (KP_LEFT_HIP, KP_WAIST, KP_RIGHT_HIP),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
    /// Visible points scaled into [0, 1] by their bounding box
    #[default]
    BoundingBox,
    /// Relative to the hip midpoint, in hip widths
    HipCenter,
}

impl Normalization {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bbox" | "bounding_box" => Some(Normalization::BoundingBox),
            "hip_center" => Some(Normalization::HipCenter),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeatureSet {
    Coordinates,
    Angles,
    #[default]
    Hybrid,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        match self {
            FeatureSet::Coordinates => COORDINATE_FEATURES,
            FeatureSet::Angles => ANGLE_FEATURES,
            FeatureSet::Hybrid => HYBRID_FEATURES,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "coordinates" => Some(FeatureSet::Coordinates),
            "angles" => Some(FeatureSet::Angles),
            "hybrid" => Some(FeatureSet::Hybrid),
            _ => None,
        }
    }
}

/// Normalized (x, y) per keypoint; hidden keypoints stay at the origin
pub fn normalize_coordinates(keypoints: &[Keypoint], method: Normalization) -> Vec<(f32, f32)> {
    let mut points = vec![(0.0, 0.0); keypoints.len()];
    if !keypoints.iter().any(|kp| kp.visible) {
        return points;
    }

    let (origin, scale) = match method {
        Normalization::BoundingBox => {
            let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
            let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
            for kp in keypoints.iter().filter(|kp| kp.visible) {
                min_x = min_x.min(kp.x);
                min_y = min_y.min(kp.y);
                max_x = max_x.max(kp.x);
                max_y = max_y.max(kp.y);
            }
            let range = |r: f32| if r > 0.0 { r } else { 1.0 };
            ((min_x, min_y), (range(max_x - min_x), range(max_y - min_y)))
        }
        Normalization::HipCenter => {
            let (Some(lh), Some(rh)) = (keypoints.get(KP_LEFT_HIP), keypoints.get(KP_RIGHT_HIP)) else {
                return points;
            };
            if !(lh.visible && rh.visible) {
                return points;
            }
            let width = (rh.x - lh.x).hypot(rh.y - lh.y);
            let width = if width < MIN_HIP_WIDTH { 1.0 } else { width };
            (((lh.x + rh.x) / 2.0, (lh.y + rh.y) / 2.0), (width, width))
        }
    };

    for (point, kp) in points.iter_mut().zip(keypoints).filter(|(_, kp)| kp.visible) {
        *point = ((kp.x - origin.0) / scale.0, (kp.y - origin.1) / scale.1);
    }
    points
}

/// Ten joint angles in radians; 0 when a point is not visible
///
/// Order: knees, elbows, shoulders, hips (left then right), neck, waist.
pub fn joint_angles(points: &[(f32, f32)], visible: &[bool]) -> [f32; ANGLE_FEATURES] {
    let point = |i: usize| match (points.get(i), visible.get(i)) {
        (Some(&p), Some(&true)) => Some(p),
        _ => None,
    };
    ANGLE_TRIPLES.map(|(a, v, b)| match (point(a), point(v), point(b)) {
        (Some(a), Some(v), Some(b)) => joint_angle(a, v, b).map_or(0.0, f32::to_radians),
        _ => 0.0,
    })
}

/// Feature vector for one MediaPipe pose frame
pub fn extract_features(
    landmarks: &[Landmark],
    set: FeatureSet,
    method: Normalization,
    visibility_threshold: f32,
) -> Result<Vec<f32>> {
    let keypoints = to_keypoints(landmarks, visibility_threshold).ok_or(CoachError::InvalidLandmarkData {
        len: landmarks.len(),
        expected: POSE_LANDMARK_COUNT,
    })?;
    let visible = keypoints.map(|kp| kp.visible);
    let points = normalize_coordinates(&keypoints, method);

    let mut features = Vec::with_capacity(set.len());
    if matches!(set, FeatureSet::Coordinates | FeatureSet::Hybrid) {
        features.extend(points.iter().flat_map(|&(x, y)| [x, y]));
    }
    if matches!(set, FeatureSet::Angles | FeatureSet::Hybrid) {
        features.extend_from_slice(&joint_angles(&points, &visible));
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{
        LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, NOSE, RIGHT_ANKLE, RIGHT_ELBOW,
        RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
    };
    use std::f32::consts::{FRAC_PI_2, PI};

    fn t_pose() -> Vec<Landmark> {
        let mut lm = vec![Landmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
        lm[NOSE] = Landmark::new(0.5, 0.15);
        lm[LEFT_SHOULDER] = Landmark::new(0.45, 0.3);
        lm[RIGHT_SHOULDER] = Landmark::new(0.55, 0.3);
        lm[LEFT_ELBOW] = Landmark::new(0.35, 0.3);
        lm[RIGHT_ELBOW] = Landmark::new(0.65, 0.3);
        lm[LEFT_WRIST] = Landmark::new(0.25, 0.3);
        lm[RIGHT_WRIST] = Landmark::new(0.75, 0.3);
        lm[LEFT_HIP] = Landmark::new(0.45, 0.6);
        lm[RIGHT_HIP] = Landmark::new(0.55, 0.6);
        lm[LEFT_KNEE] = Landmark::new(0.45, 0.75);
        lm[RIGHT_KNEE] = Landmark::new(0.55, 0.75);
        lm[LEFT_ANKLE] = Landmark::new(0.45, 0.9);
        lm[RIGHT_ANKLE] = Landmark::new(0.55, 0.9);
        lm
    }

    fn angles(pose: &[Landmark]) -> Vec<f32> {
        extract_features(pose, FeatureSet::Angles, Normalization::HipCenter, 0.5).unwrap()
    }

    #[test]
    fn test_feature_lengths() {
        let pose = t_pose();
        for set in [FeatureSet::Coordinates, FeatureSet::Angles, FeatureSet::Hybrid] {
            let features = extract_features(&pose, set, Normalization::BoundingBox, 0.5).unwrap();
            assert_eq!(features.len(), set.len());
        }
        assert_eq!(FeatureSet::Coordinates.len(), 48);
        assert_eq!(FeatureSet::Hybrid.len(), 58);
    }

    #[test]
    fn test_bounding_box_range() {
        let features = extract_features(&t_pose(), FeatureSet::Coordinates, Normalization::BoundingBox, 0.5).unwrap();
        assert!(features.iter().all(|&v| (0.0..=1.0).contains(&v)));
        // Left wrist is the leftmost point
        assert_eq!(features[KP_LEFT_WRIST * 2], 0.0);
        assert_eq!(features[KP_RIGHT_WRIST * 2], 1.0);
    }

    #[test]
    fn test_hip_center() {
        let keypoints = to_keypoints(&t_pose(), 0.5).unwrap();
        let points = normalize_coordinates(&keypoints, Normalization::HipCenter);
        let (lx, ly) = points[KP_LEFT_HIP];
        assert!((lx + 0.5).abs() < 1e-4);
        assert!(ly.abs() < 1e-4);
    }

    #[test]
    fn test_angles_in_radians() {
        let features = angles(&t_pose());
        // Straight legs and arms
        for i in 0..4 {
            assert!((features[i] - PI).abs() < 1e-3, "angle {} = {}", i, features[i]);
        }
        // Arms out sideways: elbow-shoulder-hip is a right angle
        assert!((features[4] - FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_neck_and_waist_follow_the_torso() {
        let upright = angles(&t_pose());
        assert!(upright[8] < PI - 0.1, "neck {}", upright[8]);
        assert!(upright[9] < PI - 0.1, "waist {}", upright[9]);

        // Head tilted toward the left shoulder
        let mut tilted = t_pose();
        tilted[NOSE] = Landmark::new(0.4, 0.2);
        let tilted = angles(&tilted);
        assert!((tilted[8] - upright[8]).abs() > 0.05);

        // Torso leaning right over the hips
        let mut leaning = t_pose();
        leaning[LEFT_SHOULDER] = Landmark::new(0.55, 0.3);
        leaning[RIGHT_SHOULDER] = Landmark::new(0.65, 0.3);
        let leaning = angles(&leaning);
        assert!((leaning[9] - upright[9]).abs() > 0.03);
    }

    #[test]
    fn test_invisible_joint_is_zero() {
        let mut pose = t_pose();
        pose[LEFT_KNEE] = pose[LEFT_KNEE].with_visibility(0.1);
        let features = extract_features(&pose, FeatureSet::Angles, Normalization::BoundingBox, 0.5).unwrap();
        assert_eq!(features[0], 0.0);
        assert_eq!(features[6], 0.0);
        assert!(features[1] > 0.0);
    }

    #[test]
    fn test_short_frame_rejected() {
        let result = extract_features(&[Landmark::default(); 20], FeatureSet::Hybrid, Normalization::BoundingBox, 0.5);
        assert!(matches!(result, Err(CoachError::InvalidLandmarkData { len: 20, expected: 33 })));
    }
}
