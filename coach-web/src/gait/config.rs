//! Gait analyzer tunables

use serde::Deserialize;

use super::frame::ViewType;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaitConfig {
    /// Frame history kept for rolling charts
    pub max_frames: usize,
    /// Used to convert normalized stride length to meters
    pub subject_height_m: f32,
    /// Video width / height; corrects normalized x against y
    pub aspect_ratio: f32,
    /// Fixed camera view, None to detect it from the frames
    pub view: Option<ViewType>,
    /// Foot within this fraction of leg length above the floor is in contact
    pub contact_tolerance: f32,
    /// Vertical foot speeds below this fraction of leg length per second read as still
    pub velocity_dead_zone: f32,
    /// Frames the rolling floor baseline looks back over
    pub floor_window: usize,
    pub min_stride_seconds: f64,
    /// Longer cycles are treated as pauses and discarded
    pub max_stride_seconds: f64,
    pub visibility_threshold: f32,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            max_frames: 900,
            subject_height_m: 1.70,
            aspect_ratio: 16.0 / 9.0,
            view: None,
            contact_tolerance: 0.06,
            velocity_dead_zone: 0.10,
            floor_window: 60,
            min_stride_seconds: 0.4,
            max_stride_seconds: 2.5,
            visibility_threshold: 0.3,
        }
    }
}

impl GaitConfig {
    /// Replace unusable values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = GaitConfig::default();
        if self.max_frames == 0 {
            self.max_frames = defaults.max_frames;
        }
        if !(self.subject_height_m > 0.5 && self.subject_height_m < 2.5) {
            self.subject_height_m = defaults.subject_height_m;
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            self.aspect_ratio = defaults.aspect_ratio;
        }
        if !(self.contact_tolerance > 0.0) {
            self.contact_tolerance = defaults.contact_tolerance;
        }
        if !(self.velocity_dead_zone >= 0.0) {
            self.velocity_dead_zone = defaults.velocity_dead_zone;
        }
        self.floor_window = self.floor_window.max(1);
        if !(self.min_stride_seconds > 0.0 && self.min_stride_seconds < self.max_stride_seconds) {
            self.min_stride_seconds = defaults.min_stride_seconds;
            self.max_stride_seconds = defaults.max_stride_seconds;
        }
        self.visibility_threshold = self.visibility_threshold.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: GaitConfig = serde_json::from_str(r#"{"view":"side","subjectHeightM":1.8}"#).unwrap();
        assert_eq!(config.view, Some(ViewType::Side));
        assert_eq!(config.subject_height_m, 1.8);
        assert_eq!(config.max_frames, 900);
    }

    #[test]
    fn test_sanitized() {
        let config = GaitConfig {
            max_frames: 0,
            aspect_ratio: f32::NAN,
            min_stride_seconds: 3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.max_frames, 900);
        assert_eq!(config.aspect_ratio, 16.0 / 9.0);
        assert_eq!(config.min_stride_seconds, 0.4);
    }
}
