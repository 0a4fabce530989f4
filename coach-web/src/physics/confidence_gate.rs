//! Confidence Gate - hold the last good joint angle through dropouts
//!
//! When the joint's landmarks fall below the visibility threshold (or the
//! geometry is degenerate), the last angle measured with good data is used.

/// Default minimum visibility to accept a measurement
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// Confidence gate for a single joint angle
pub struct ConfidenceGate {
    /// Last angle measured with good data
    last_valid: Option<f32>,
    threshold: f32,
}

impl ConfidenceGate {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_VISIBILITY_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            last_valid: None,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.clamp(0.0, 1.0);
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Good data passes through and is remembered; otherwise the last
    /// good value is returned (None if there never was one).
    pub fn apply(&mut self, angle: Option<f32>, confidence: f32) -> Option<f32> {
        match angle {
            Some(a) if a.is_finite() && confidence >= self.threshold => {
                self.last_valid = Some(a);
                Some(a)
            }
            _ => self.last_valid,
        }
    }

    pub fn last_valid(&self) -> Option<f32> {
        self.last_valid
    }

    pub fn reset(&mut self) {
        self.last_valid = None;
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new()
    }
}
