//! A single tracked keypoint as delivered by the pose/hand detector

use serde::{Deserialize, Serialize};

/// Normalized landmark: `x`/`y` in 0-1 of frame width/height, `y` grows downward
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth (detector-specific scale)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// Detector confidence 0-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None, visibility: None }
    }

    pub fn with_depth(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Planar position
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Position with depth (0 when the detector gave none)
    pub fn xyz(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.z.unwrap_or(0.0))
    }

    /// Missing visibility counts as visible; non-finite coordinates never do
    pub fn is_visible(&self, threshold: f32) -> bool {
        if !self.x.is_finite() || !self.y.is_finite() {
            return false;
        }
        self.visibility.map_or(true, |v| v >= threshold)
    }

    /// Visibility as a number, treating "not reported" as fully visible
    pub fn confidence(&self) -> f32 {
        self.visibility.unwrap_or(1.0)
    }

    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Midpoint of two landmarks; visibility is the weaker of the two
pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
    let visibility = match (a.visibility, b.visibility) {
        (Some(va), Some(vb)) => Some(va.min(vb)),
        (v, None) | (None, v) => v,
    };
    let z = match (a.z, b.z) {
        (Some(za), Some(zb)) => Some((za + zb) * 0.5),
        _ => None,
    };
    Landmark {
        x: (a.x + b.x) * 0.5,
        y: (a.y + b.y) * 0.5,
        z,
        visibility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_defaults_to_visible() {
        let lm = Landmark::new(0.5, 0.5);
        assert!(lm.is_visible(0.9));
        assert!(!lm.with_visibility(0.2).is_visible(0.5));
    }

    #[test]
    fn test_nan_is_never_visible() {
        let lm = Landmark::new(f32::NAN, 0.5).with_visibility(1.0);
        assert!(!lm.is_visible(0.0));
    }

    #[test]
    fn test_midpoint() {
        let a = Landmark::new(0.2, 0.4).with_visibility(0.9);
        let b = Landmark::new(0.4, 0.6).with_visibility(0.6);
        let m = midpoint(&a, &b);
        assert!((m.x - 0.3).abs() < 1e-6);
        assert!((m.y - 0.5).abs() < 1e-6);
        assert_eq!(m.visibility, Some(0.6));
        assert_eq!(m.z, None);
    }
}
