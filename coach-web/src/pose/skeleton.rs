//! Landmark index schema (MediaPipe Pose - 33, MediaPipe Hands - 21)
//!
//! Indices are stable across frames. A frame shorter than the schema
//! is treated as "no data" by every consumer.

// ============================================================================
// BODY LANDMARK INDICES
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_EYE: usize = 2;
pub const RIGHT_EYE: usize = 5;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_PINKY: usize = 17;
pub const RIGHT_PINKY: usize = 18;
pub const LEFT_INDEX: usize = 19;
pub const RIGHT_INDEX: usize = 20;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;
pub const LEFT_HEEL: usize = 29;
pub const RIGHT_HEEL: usize = 30;
pub const LEFT_FOOT_INDEX: usize = 31;
pub const RIGHT_FOOT_INDEX: usize = 32;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const HAND_LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Fingertips in the order a thumb-opposition sequence visits them
pub const OPPOSITION_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ============================================================================
// JOINT TRIPLES
// ============================================================================

/// Which detector schema a frame follows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodySchema {
    Pose,
    Hand,
}

impl BodySchema {
    pub fn landmark_count(&self) -> usize {
        match self {
            BodySchema::Pose => POSE_LANDMARK_COUNT,
            BodySchema::Hand => HAND_LANDMARK_COUNT,
        }
    }
}

/// Proximal - vertex - distal landmark indices defining one joint angle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointTriple {
    pub proximal: usize,
    pub vertex: usize,
    pub distal: usize,
}

impl JointTriple {
    pub const fn new(proximal: usize, vertex: usize, distal: usize) -> Self {
        Self { proximal, vertex, distal }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.proximal, self.vertex, self.distal]
    }
}

pub const LEFT_KNEE_JOINT: JointTriple = JointTriple::new(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE);
pub const RIGHT_KNEE_JOINT: JointTriple = JointTriple::new(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE);
pub const LEFT_HIP_JOINT: JointTriple = JointTriple::new(LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE);
pub const RIGHT_HIP_JOINT: JointTriple = JointTriple::new(RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE);
pub const LEFT_ANKLE_JOINT: JointTriple = JointTriple::new(LEFT_KNEE, LEFT_ANKLE, LEFT_FOOT_INDEX);
pub const RIGHT_ANKLE_JOINT: JointTriple = JointTriple::new(RIGHT_KNEE, RIGHT_ANKLE, RIGHT_FOOT_INDEX);
pub const LEFT_ELBOW_JOINT: JointTriple = JointTriple::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST);
pub const RIGHT_ELBOW_JOINT: JointTriple = JointTriple::new(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST);
pub const LEFT_SHOULDER_JOINT: JointTriple = JointTriple::new(LEFT_ELBOW, LEFT_SHOULDER, LEFT_HIP);
pub const RIGHT_SHOULDER_JOINT: JointTriple = JointTriple::new(RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_HIP);
/// Shoulder - hip - ankle body line (plank)
pub const LEFT_BODY_LINE: JointTriple = JointTriple::new(LEFT_SHOULDER, LEFT_HIP, LEFT_ANKLE);
pub const RIGHT_BODY_LINE: JointTriple = JointTriple::new(RIGHT_SHOULDER, RIGHT_HIP, RIGHT_ANKLE);

pub const INDEX_PIP_JOINT: JointTriple = JointTriple::new(INDEX_MCP, INDEX_PIP, INDEX_DIP);
pub const MIDDLE_PIP_JOINT: JointTriple = JointTriple::new(MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP);
