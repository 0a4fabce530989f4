//! MediaPipe pose → 24-keypoint posture schema
//!
//! The posture model consumes the fitness dataset layout: the 17 COCO
//! points, then Neck, palms, Back, Waist and feet. Those last seven have
//! no MediaPipe counterpart and are placed from body geometry.

use crate::pose::{
    Landmark, LEFT_ANKLE, LEFT_EAR, LEFT_ELBOW, LEFT_EYE, LEFT_FOOT_INDEX, LEFT_HIP, LEFT_INDEX, LEFT_KNEE,
    LEFT_PINKY, LEFT_SHOULDER, LEFT_WRIST, NOSE, POSE_LANDMARK_COUNT, RIGHT_ANKLE, RIGHT_EAR, RIGHT_ELBOW,
    RIGHT_EYE, RIGHT_FOOT_INDEX, RIGHT_HIP, RIGHT_INDEX, RIGHT_KNEE, RIGHT_PINKY, RIGHT_SHOULDER, RIGHT_WRIST,
};

pub const KEYPOINT_COUNT: usize = 24;

pub const KP_NOSE: usize = 0;
pub const KP_LEFT_SHOULDER: usize = 5;
pub const KP_RIGHT_SHOULDER: usize = 6;
pub const KP_LEFT_ELBOW: usize = 7;
pub const KP_RIGHT_ELBOW: usize = 8;
pub const KP_LEFT_WRIST: usize = 9;
pub const KP_RIGHT_WRIST: usize = 10;
pub const KP_LEFT_HIP: usize = 11;
pub const KP_RIGHT_HIP: usize = 12;
pub const KP_LEFT_KNEE: usize = 13;
pub const KP_RIGHT_KNEE: usize = 14;
pub const KP_LEFT_ANKLE: usize = 15;
pub const KP_RIGHT_ANKLE: usize = 16;
pub const KP_NECK: usize = 17;
pub const KP_LEFT_PALM: usize = 18;
pub const KP_RIGHT_PALM: usize = 19;
pub const KP_BACK: usize = 20;
pub const KP_WAIST: usize = 21;
pub const KP_LEFT_FOOT: usize = 22;
pub const KP_RIGHT_FOOT: usize = 23;

/// MediaPipe source of keypoints 0..17
const DIRECT: [usize; 17] = [
    NOSE,
    LEFT_EYE,
    RIGHT_EYE,
    LEFT_EAR,
    RIGHT_EAR,
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_KNEE,
    RIGHT_KNEE,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

/// Neck position along shoulder midpoint → head
const NECK_RISE: f32 = 0.3;

/// Waist position along hip midpoint → shoulder midpoint
const WAIST_RISE: f32 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

impl Keypoint {
    fn from_landmark(lm: &Landmark, threshold: f32) -> Self {
        Self {
            x: lm.x,
            y: lm.y,
            visible: lm.is_visible(threshold),
        }
    }

    /// Point `t` of the way toward `to`; hidden unless both ends are visible
    fn toward(&self, to: &Keypoint, t: f32) -> Keypoint {
        if !(self.visible && to.visible) {
            return Keypoint::default();
        }
        Keypoint {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            visible: true,
        }
    }
}

/// Centroid of the points, hidden if any of them is
fn centroid(points: &[Keypoint]) -> Keypoint {
    if points.is_empty() || !points.iter().all(|p| p.visible) {
        return Keypoint::default();
    }
    let n = points.len() as f32;
    Keypoint {
        x: points.iter().map(|p| p.x).sum::<f32>() / n,
        y: points.iter().map(|p| p.y).sum::<f32>() / n,
        visible: true,
    }
}

/// Map one MediaPipe pose frame onto the 24-keypoint schema
///
/// Returns None for frames shorter than the pose schema.
pub fn to_keypoints(landmarks: &[Landmark], threshold: f32) -> Option<[Keypoint; KEYPOINT_COUNT]> {
    if landmarks.len() < POSE_LANDMARK_COUNT {
        return None;
    }
    let lm = |i: usize| Keypoint::from_landmark(&landmarks[i], threshold);

    let mut keypoints = [Keypoint::default(); KEYPOINT_COUNT];
    for (slot, &index) in keypoints.iter_mut().zip(DIRECT.iter()) {
        *slot = lm(index);
    }

    let shoulders = centroid(&[lm(LEFT_SHOULDER), lm(RIGHT_SHOULDER)]);
    let hips = centroid(&[lm(LEFT_HIP), lm(RIGHT_HIP)]);
    // Ears stand in for a hidden nose
    let head = if lm(NOSE).visible {
        lm(NOSE)
    } else {
        centroid(&[lm(LEFT_EAR), lm(RIGHT_EAR)])
    };

    keypoints[KP_NECK] = if head.visible {
        shoulders.toward(&head, NECK_RISE)
    } else {
        shoulders
    };
    keypoints[KP_LEFT_PALM] = centroid(&[lm(LEFT_WRIST), lm(LEFT_INDEX), lm(LEFT_PINKY)]);
    keypoints[KP_RIGHT_PALM] = centroid(&[lm(RIGHT_WRIST), lm(RIGHT_INDEX), lm(RIGHT_PINKY)]);
    keypoints[KP_BACK] = shoulders.toward(&hips, 0.5);
    keypoints[KP_WAIST] = if shoulders.visible {
        hips.toward(&shoulders, WAIST_RISE)
    } else {
        hips
    };
    keypoints[KP_LEFT_FOOT] = lm(LEFT_FOOT_INDEX);
    keypoints[KP_RIGHT_FOOT] = lm(RIGHT_FOOT_INDEX);
    Some(keypoints)
}
