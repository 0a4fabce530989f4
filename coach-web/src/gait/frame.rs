//! Gait frame types - per-frame phase and joint angle snapshot

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

/// Camera position relative to the walking direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewType {
    Front,
    Side,
    Rear,
}

impl ViewType {
    /// Left/right comparisons need both legs in view
    pub fn supports_symmetry(&self) -> bool {
        !matches!(self, ViewType::Side)
    }

    /// Joint ranges and stride length need the legs seen from the side
    pub fn supports_sagittal(&self) -> bool {
        matches!(self, ViewType::Side)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaitPhase {
    Stance,
    Swing,
    DoubleSupport,
    /// Leg not tracked on this frame
    Unknown,
}

impl GaitPhase {
    /// Foot on the ground (single or double support)
    pub fn is_loaded(&self) -> bool {
        matches!(self, GaitPhase::Stance | GaitPhase::DoubleSupport)
    }
}

/// Lower-limb joint angles in degrees, None when not measurable
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JointAngles {
    pub knee: Option<f32>,
    pub hip: Option<f32>,
    pub ankle: Option<f32>,
}

impl JointAngles {
    /// Knee flexion from straight (180° knee angle = 0° flexion)
    pub fn knee_flexion(&self) -> Option<f32> {
        self.knee.map(|k| 180.0 - k)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegFrame {
    pub phase: GaitPhase,
    pub in_contact: bool,
    /// Heel strike detected on this frame
    pub heel_strike: bool,
    pub angles: JointAngles,
}

impl LegFrame {
    pub const UNTRACKED: LegFrame = LegFrame {
        phase: GaitPhase::Unknown,
        in_contact: false,
        heel_strike: false,
        angles: JointAngles {
            knee: None,
            hip: None,
            ankle: None,
        },
    };
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaitFrame {
    pub timestamp: f64,
    /// False when the frame was unusable (short, stopped, out of order)
    pub tracked: bool,
    pub view: ViewType,
    pub left: LegFrame,
    pub right: LegFrame,
    /// Trunk inclination from vertical in degrees
    pub trunk_lean: Option<f32>,
}

impl GaitFrame {
    pub fn untracked(timestamp: f64, view: ViewType) -> Self {
        Self {
            timestamp,
            tracked: false,
            view,
            left: LegFrame::UNTRACKED,
            right: LegFrame::UNTRACKED,
            trunk_lean: None,
        }
    }
}
