//! Gait analyzer - landmark frames in, phases and a session report out
//!
//! One analyzer per analysis session. Frames must arrive with strictly
//! increasing timestamps; anything else is returned as an untracked frame
//! and leaves the state untouched.

use std::collections::VecDeque;

use super::config::GaitConfig;
use super::contact::FootTracker;
use super::cycle::{CycleTracker, GaitCycle};
use super::frame::{GaitFrame, GaitPhase, JointAngles, LegFrame, Side, ViewType};
use super::report::{
    detect_anomalies, overall_score, recommendations, symmetry, GaitAnalysisResult, GaitMeasurements,
    PhaseBreakdown, SymmetryStatus,
};
use crate::physics::{inclination_from_vertical, landmark_angle};
use crate::pose::{
    midpoint, JointTriple, Landmark, LEFT_ANKLE, LEFT_ANKLE_JOINT, LEFT_HEEL, LEFT_HIP, LEFT_HIP_JOINT,
    LEFT_KNEE_JOINT, LEFT_SHOULDER, NOSE, POSE_LANDMARK_COUNT, RIGHT_ANKLE, RIGHT_ANKLE_JOINT,
    RIGHT_HEEL, RIGHT_HIP, RIGHT_HIP_JOINT, RIGHT_KNEE_JOINT, RIGHT_SHOULDER,
};

/// Shoulder width / torso height below this means the subject is side-on
pub const SIDE_VIEW_RATIO: f32 = 0.35;

/// Nose-to-heel distance as a share of standing height
const NOSE_TO_HEEL_FRACTION: f32 = 0.93;

/// Hip-to-ankle length assumed until one is measured (frame-height units)
const DEFAULT_LEG_LENGTH: f32 = 0.4;

/// Weight of a new leg length measurement in the running estimate
const LEG_LENGTH_SMOOTHING: f32 = 0.1;

struct LegIndices {
    hip: usize,
    ankle: usize,
    heel: usize,
    knee_joint: JointTriple,
    hip_joint: JointTriple,
    ankle_joint: JointTriple,
}

const LEFT_LEG: LegIndices = LegIndices {
    hip: LEFT_HIP,
    ankle: LEFT_ANKLE,
    heel: LEFT_HEEL,
    knee_joint: LEFT_KNEE_JOINT,
    hip_joint: LEFT_HIP_JOINT,
    ankle_joint: LEFT_ANKLE_JOINT,
};

const RIGHT_LEG: LegIndices = LegIndices {
    hip: RIGHT_HIP,
    ankle: RIGHT_ANKLE,
    heel: RIGHT_HEEL,
    knee_joint: RIGHT_KNEE_JOINT,
    hip_joint: RIGHT_HIP_JOINT,
    ankle_joint: RIGHT_ANKLE_JOINT,
};

struct LegTracker {
    indices: &'static LegIndices,
    foot: FootTracker,
    cycles: CycleTracker,
}

impl LegTracker {
    fn new(side: Side, config: &GaitConfig) -> Self {
        let indices = match side {
            Side::Left => &LEFT_LEG,
            Side::Right => &RIGHT_LEG,
        };
        Self {
            indices,
            foot: FootTracker::new(config.floor_window, config.min_stride_seconds),
            cycles: CycleTracker::new(side, config.min_stride_seconds, config.max_stride_seconds),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct RunningMean {
    sum: f64,
    count: u32,
}

impl RunningMean {
    fn add(&mut self, value: f32) {
        if value.is_finite() {
            self.sum += value as f64;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f32> {
        (self.count > 0).then(|| (self.sum / self.count as f64) as f32)
    }
}

/// Leg-seconds spent in each phase
#[derive(Clone, Copy, Debug, Default)]
struct PhaseTally {
    stance: f64,
    swing: f64,
    double_support: f64,
}

impl PhaseTally {
    fn add(&mut self, phase: GaitPhase, dt: f64) {
        match phase {
            GaitPhase::Stance => self.stance += dt,
            GaitPhase::Swing => self.swing += dt,
            GaitPhase::DoubleSupport => self.double_support += dt,
            GaitPhase::Unknown => {}
        }
    }

    fn breakdown(&self) -> PhaseBreakdown {
        let total = self.stance + self.swing + self.double_support;
        if total <= 0.0 {
            return PhaseBreakdown::default();
        }
        let percent = |s: f64| (s / total * 100.0) as f32;
        PhaseBreakdown {
            stance: percent(self.stance),
            swing: percent(self.swing),
            double_support: percent(self.double_support),
        }
    }
}

pub struct GaitAnalyzer {
    config: GaitConfig,
    left: LegTracker,
    right: LegTracker,
    frames: VecDeque<GaitFrame>,
    /// Per-frame view votes: front, side, rear
    view_votes: [u32; 3],
    active: bool,
    first_timestamp: Option<f64>,
    last_timestamp: Option<f64>,
    leg_length: Option<f32>,
    body_span: RunningMean,
    trunk_lean: RunningMean,
    phase_time: PhaseTally,
}

impl GaitAnalyzer {
    pub fn new(config: GaitConfig) -> Self {
        let config = config.sanitized();
        Self {
            left: LegTracker::new(Side::Left, &config),
            right: LegTracker::new(Side::Right, &config),
            frames: VecDeque::with_capacity(config.max_frames.min(1024)),
            view_votes: [0; 3],
            active: true,
            first_timestamp: None,
            last_timestamp: None,
            leg_length: None,
            body_span: RunningMean::default(),
            trunk_lean: RunningMean::default(),
            phase_time: PhaseTally::default(),
            config,
        }
    }

    pub fn config(&self) -> &GaitConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Frames currently held in the bounded history
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn cycles(&self, side: Side) -> &[GaitCycle] {
        match side {
            Side::Left => self.left.cycles.cycles(),
            Side::Right => self.right.cycles.cycles(),
        }
    }

    /// Session view: the configured one, else the majority of per-frame votes
    pub fn view(&self) -> ViewType {
        if let Some(view) = self.config.view {
            return view;
        }
        let views = [ViewType::Front, ViewType::Side, ViewType::Rear];
        let mut best = 0;
        for i in 1..views.len() {
            if self.view_votes[i] > self.view_votes[best] {
                best = i;
            }
        }
        views[best]
    }

    /// Feed one pose frame taken at `timestamp` seconds
    pub fn process_frame(&mut self, landmarks: &[Landmark], timestamp: f64) -> GaitFrame {
        if !self.active {
            return GaitFrame::untracked(timestamp, self.view());
        }
        if landmarks.len() < POSE_LANDMARK_COUNT {
            log::debug!("gait: short frame ({} landmarks), skipping", landmarks.len());
            return GaitFrame::untracked(timestamp, self.view());
        }
        if !timestamp.is_finite() || self.last_timestamp.is_some_and(|last| timestamp <= last) {
            log::trace!("gait: dropping out-of-order frame at {}", timestamp);
            return GaitFrame::untracked(timestamp, self.view());
        }
        let dt = self.last_timestamp.map_or(0.0, |last| timestamp - last);
        self.last_timestamp = Some(timestamp);
        self.first_timestamp.get_or_insert(timestamp);

        // Work in frame-height units on both axes
        let aspect = self.config.aspect_ratio;
        let scaled: Vec<Landmark> = landmarks
            .iter()
            .map(|lm| Landmark { x: lm.x * aspect, ..*lm })
            .collect();
        let threshold = self.config.visibility_threshold;

        if let Some(view) = detect_view(&scaled, threshold) {
            let slot = match view {
                ViewType::Front => 0,
                ViewType::Side => 1,
                ViewType::Rear => 2,
            };
            self.view_votes[slot] += 1;
        }

        self.update_leg_length(&scaled);
        let leg_length = self.leg_length.unwrap_or(DEFAULT_LEG_LENGTH);
        let tolerance = self.config.contact_tolerance * leg_length;
        let dead_zone = self.config.velocity_dead_zone * leg_length;

        let left = track_leg(&mut self.left, &scaled, timestamp, threshold, tolerance, dead_zone);
        let right = track_leg(&mut self.right, &scaled, timestamp, threshold, tolerance, dead_zone);

        let (mut left_frame, mut right_frame) = (left.0, right.0);
        if left_frame.phase == GaitPhase::Stance && right_frame.phase == GaitPhase::Stance {
            left_frame.phase = GaitPhase::DoubleSupport;
            right_frame.phase = GaitPhase::DoubleSupport;
        }

        for (leg, frame, heel_x) in [
            (&mut self.left, &left_frame, left.1),
            (&mut self.right, &right_frame, right.1),
        ] {
            if let (true, Some(x)) = (frame.heel_strike, heel_x) {
                leg.cycles.heel_strike(timestamp, x);
            }
            leg.cycles.observe(timestamp, frame.phase, &frame.angles);
            self.phase_time.add(frame.phase, dt);
        }

        let trunk_lean = trunk_lean(&scaled, threshold);
        if let Some(lean) = trunk_lean {
            self.trunk_lean.add(lean);
        }
        self.update_body_span(&scaled, threshold);

        let frame = GaitFrame {
            timestamp,
            tracked: true,
            view: self.view(),
            left: left_frame,
            right: right_frame,
            trunk_lean,
        };

        if self.frames.len() >= self.config.max_frames {
            self.frames.pop_front();
        }
        self.frames.push_back(frame.clone());
        frame
    }

    fn update_leg_length(&mut self, scaled: &[Landmark]) {
        let threshold = self.config.visibility_threshold;
        let lengths: Vec<f32> = [&LEFT_LEG, &RIGHT_LEG]
            .iter()
            .filter_map(|leg| {
                let hip = &scaled[leg.hip];
                let ankle = &scaled[leg.ankle];
                (hip.is_visible(threshold) && ankle.is_visible(threshold)).then(|| hip.distance(ankle))
            })
            .filter(|l| *l > 0.01)
            .collect();
        if lengths.is_empty() {
            return;
        }
        let measured = lengths.iter().sum::<f32>() / lengths.len() as f32;
        self.leg_length = Some(match self.leg_length {
            Some(prev) => prev + LEG_LENGTH_SMOOTHING * (measured - prev),
            None => measured,
        });
    }

    fn update_body_span(&mut self, scaled: &[Landmark], threshold: f32) {
        let nose = &scaled[NOSE];
        if !nose.is_visible(threshold) {
            return;
        }
        let lowest_heel = [LEFT_HEEL, RIGHT_HEEL]
            .iter()
            .map(|&i| &scaled[i])
            .filter(|lm| lm.is_visible(threshold))
            .map(|lm| lm.y)
            .reduce(f32::max);
        if let Some(heel_y) = lowest_heel {
            let span = heel_y - nose.y;
            if span > 0.05 {
                self.body_span.add(span);
            }
        }
    }

    /// Meters per frame-height unit, from the subject height and their span in frame
    fn meters_per_unit(&self) -> Option<f32> {
        let span = self.body_span.mean()?;
        Some(self.config.subject_height_m * NOSE_TO_HEEL_FRACTION / span)
    }

    /// Most recent `n` frames, oldest first
    pub fn recent_frames(&self, n: usize) -> Vec<GaitFrame> {
        let skip = self.frames.len().saturating_sub(n);
        self.frames.iter().skip(skip).cloned().collect()
    }

    /// Aggregate the session; `created_at_ms` stamps the result
    ///
    /// With no completed stride the result carries `insufficient_data` and
    /// zeroed measurements.
    pub fn generate_analysis_result(&self, created_at_ms: f64) -> GaitAnalysisResult {
        let view = self.view();
        // Stride length and joint ranges need the walking direction across the frame
        let sagittal = view.supports_sagittal();
        let scale = if sagittal { self.meters_per_unit() } else { None };
        let scaled_cycles = |cycles: &[GaitCycle]| -> Vec<GaitCycle> {
            cycles
                .iter()
                .cloned()
                .map(|mut c| {
                    if let Some(s) = scale {
                        c.apply_scale(s);
                    }
                    if !sagittal {
                        c.clear_joint_ranges();
                    }
                    c
                })
                .collect()
        };
        let left_cycles = scaled_cycles(self.left.cycles.cycles());
        let right_cycles = scaled_cycles(self.right.cycles.cycles());
        let all_cycles: Vec<GaitCycle> = left_cycles.iter().chain(right_cycles.iter()).cloned().collect();

        let trunk_lean = self.trunk_lean.mean();
        let left = measure(&left_cycles, trunk_lean);
        let right = measure(&right_cycles, trunk_lean);
        let measurements = measure(&all_cycles, trunk_lean);

        let (symmetry, symmetry_status) = if !view.supports_symmetry() {
            (None, SymmetryStatus::SuppressedSideView)
        } else if left.strides == 0 || right.strides == 0 {
            (None, SymmetryStatus::InsufficientData)
        } else {
            (Some(symmetry(&left, &right)), SymmetryStatus::Available)
        };

        let total_strides = measurements.strides;
        let insufficient_data = total_strides == 0;
        let anomalies = detect_anomalies(&measurements, &left, &right, symmetry.as_ref());
        let recommendations = if insufficient_data {
            Vec::new()
        } else {
            recommendations(&anomalies)
        };

        let duration_seconds = match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };

        let result = GaitAnalysisResult {
            id: format!("gait-{}", created_at_ms.max(0.0) as u64),
            created_at: created_at_ms,
            view,
            duration_seconds,
            total_strides,
            insufficient_data,
            sagittal_metrics: sagittal,
            overall_score: overall_score(&measurements, symmetry.as_ref()),
            phase_breakdown: self.phase_time.breakdown(),
            measurements,
            left,
            right,
            symmetry,
            symmetry_status,
            anomalies,
            recommendations,
        };

        if insufficient_data {
            log::info!("gait analysis: no completed stride in {:.1}s", duration_seconds);
        } else {
            log::info!(
                "gait analysis: {} strides, score {:.0}, {} anomalies",
                result.total_strides,
                result.overall_score,
                result.anomalies.len()
            );
        }
        result
    }

    /// Halt frame ingestion; the collected data stays available
    pub fn stop(&mut self) {
        if self.active {
            log::info!("gait analysis stopped after {} frames", self.frames.len());
        }
        self.active = false;
    }

    /// Fresh analyzer state with the same configuration
    pub fn reset(&mut self) {
        *self = GaitAnalyzer::new(self.config.clone());
        log::info!("gait analyzer reset");
    }
}

impl Default for GaitAnalyzer {
    fn default() -> Self {
        Self::new(GaitConfig::default())
    }
}

/// Front/side/rear from shoulder and hip geometry (None when not visible)
pub fn detect_view(scaled: &[Landmark], threshold: f32) -> Option<ViewType> {
    let points = [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP].map(|i| scaled.get(i));
    let [Some(ls), Some(rs), Some(lh), Some(rh)] = points else {
        return None;
    };
    if ![ls, rs, lh, rh].iter().all(|lm| lm.is_visible(threshold)) {
        return None;
    }

    let shoulder_width = (ls.x - rs.x).abs();
    let torso_height = (midpoint(ls, rs).y - midpoint(lh, rh).y).abs();
    if torso_height < 1e-3 {
        return None;
    }

    if shoulder_width / torso_height < SIDE_VIEW_RATIO {
        Some(ViewType::Side)
    } else if scaled.get(NOSE).is_some_and(|nose| nose.is_visible(threshold)) {
        Some(ViewType::Front)
    } else {
        Some(ViewType::Rear)
    }
}

fn trunk_lean(scaled: &[Landmark], threshold: f32) -> Option<f32> {
    let points = [&scaled[LEFT_SHOULDER], &scaled[RIGHT_SHOULDER], &scaled[LEFT_HIP], &scaled[RIGHT_HIP]];
    if !points.iter().all(|lm| lm.is_visible(threshold)) {
        return None;
    }
    let shoulders = midpoint(points[0], points[1]);
    let hips = midpoint(points[2], points[3]);
    inclination_from_vertical(hips.xy(), shoulders.xy())
}

/// Foot tracking and joint angles for one leg; also returns the heel x
fn track_leg(
    leg: &mut LegTracker,
    scaled: &[Landmark],
    timestamp: f64,
    threshold: f32,
    tolerance: f32,
    dead_zone: f32,
) -> (LegFrame, Option<f32>) {
    let idx = leg.indices;
    let angles = JointAngles {
        knee: landmark_angle(scaled, idx.knee_joint, threshold, false),
        hip: landmark_angle(scaled, idx.hip_joint, threshold, false),
        ankle: landmark_angle(scaled, idx.ankle_joint, threshold, false),
    };

    // Heel first, ankle as fallback
    let foot = [idx.heel, idx.ankle]
        .iter()
        .map(|&i| &scaled[i])
        .find(|lm| lm.is_visible(threshold));
    let Some(foot) = foot else {
        return (LegFrame { angles, ..LegFrame::UNTRACKED }, None);
    };

    let sample = leg.foot.update(timestamp, foot.xy(), tolerance, dead_zone);
    let phase = if sample.planted {
        GaitPhase::Stance
    } else {
        GaitPhase::Swing
    };
    let frame = LegFrame {
        phase,
        in_contact: sample.in_contact,
        heel_strike: sample.heel_strike,
        angles,
    };
    (frame, Some(sample.position.0))
}

/// Mean over cycles; optional fields average over the cycles that have them
fn measure(cycles: &[GaitCycle], trunk_lean: Option<f32>) -> GaitMeasurements {
    if cycles.is_empty() {
        return GaitMeasurements {
            trunk_lean,
            ..Default::default()
        };
    }
    let n = cycles.len() as f32;
    let mean = |f: fn(&GaitCycle) -> f32| cycles.iter().map(f).sum::<f32>() / n;
    let mean_opt = |f: fn(&GaitCycle) -> Option<f32>| {
        let values: Vec<f32> = cycles.iter().filter_map(f).collect();
        (!values.is_empty()).then(|| values.iter().sum::<f32>() / values.len() as f32)
    };

    GaitMeasurements {
        strides: cycles.len() as u32,
        cadence: mean(|c| c.cadence),
        stride_time: mean(|c| c.duration as f32),
        stance_percent: mean(|c| c.stance_percent),
        swing_percent: mean(|c| c.swing_percent),
        double_support_percent: mean(|c| c.double_support_percent),
        stride_length_m: mean_opt(|c| c.stride_length_m),
        speed_mps: mean_opt(|c| c.speed_mps),
        peak_knee_flexion: mean_opt(|c| c.peak_knee_flexion),
        knee_rom: mean_opt(|c| c.knee_rom),
        hip_rom: mean_opt(|c| c.hip_rom),
        ankle_rom: mean_opt(|c| c.ankle_rom),
        trunk_lean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gait::AnomalyKind;
    use crate::pose::{LEFT_FOOT_INDEX, LEFT_KNEE, RIGHT_FOOT_INDEX, RIGHT_KNEE};

    const FPS: f64 = 30.0;
    const PERIOD: f64 = 1.2;

    /// Foot height: 60% stance on the floor at 0.9, then a 0.05 lift
    fn foot_y(t: f64) -> f32 {
        let phase = (t % PERIOD) / PERIOD;
        if phase < 0.6 {
            0.9
        } else {
            let s = (phase - 0.6) / 0.4;
            0.9 - 0.05 * (std::f64::consts::PI * s).sin() as f32
        }
    }

    fn walking_frame(t: f64, view: ViewType) -> Vec<Landmark> {
        let mut lm = vec![Landmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
        let (shoulders, hips) = match view {
            ViewType::Side => ((0.50, 0.51), (0.50, 0.505)),
            _ => ((0.42, 0.58), (0.45, 0.55)),
        };
        lm[NOSE] = Landmark::new(0.5, 0.15);
        if view == ViewType::Rear {
            lm[NOSE] = lm[NOSE].with_visibility(0.0);
        }
        lm[LEFT_SHOULDER] = Landmark::new(shoulders.0, 0.3);
        lm[RIGHT_SHOULDER] = Landmark::new(shoulders.1, 0.3);

        let legs = [
            (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, LEFT_HEEL, LEFT_FOOT_INDEX, hips.0, 0.0),
            (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, RIGHT_HEEL, RIGHT_FOOT_INDEX, hips.1, PERIOD / 2.0),
        ];
        for (hip, knee, ankle, heel, toe, x, offset) in legs {
            let y = foot_y(t + offset);
            let lift = 0.9 - y;
            lm[hip] = Landmark::new(x, 0.5);
            // Knee pushes forward while the foot is lifted
            lm[knee] = Landmark::new(x + lift, 0.7);
            lm[ankle] = Landmark::new(x, y - 0.02);
            lm[heel] = Landmark::new(x, y);
            lm[toe] = Landmark::new(x + 0.03, y);
        }
        lm
    }

    fn walk(analyzer: &mut GaitAnalyzer, seconds: f64, view: ViewType) {
        for i in 0..(seconds * FPS) as usize {
            let t = i as f64 / FPS;
            analyzer.process_frame(&walking_frame(t, view), t);
        }
    }

    #[test]
    fn test_front_view_walk() {
        let mut analyzer = GaitAnalyzer::default();
        walk(&mut analyzer, 6.0, ViewType::Front);
        let result = analyzer.generate_analysis_result(1_700_000_000_000.0);

        assert_eq!(result.view, ViewType::Front);
        assert!(!result.insufficient_data);
        assert!(result.total_strides >= 2, "{} strides", result.total_strides);
        assert!(
            (45.0..=55.0).contains(&result.measurements.cadence),
            "cadence {}",
            result.measurements.cadence
        );
        assert_eq!(result.symmetry_status, SymmetryStatus::Available);
        assert!(result.symmetry.is_some());
        assert_eq!(result.id, "gait-1700000000000");
        // No stride length or joint ranges from the front
        assert_eq!(result.measurements.stride_length_m, None);
        assert_eq!(result.measurements.peak_knee_flexion, None);
        assert!(!result.sagittal_metrics);

        let phases = result.phase_breakdown;
        assert!((phases.stance + phases.swing + phases.double_support - 100.0).abs() < 0.1);
        assert!(phases.double_support > 0.0);
        assert!((0.0..=100.0).contains(&result.overall_score));
    }

    #[test]
    fn test_side_view_suppresses_symmetry() {
        let mut analyzer = GaitAnalyzer::default();
        walk(&mut analyzer, 6.0, ViewType::Side);
        let result = analyzer.generate_analysis_result(0.0);

        assert_eq!(result.view, ViewType::Side);
        assert!(result.total_strides >= 2);
        assert_eq!(result.symmetry, None);
        assert_eq!(result.symmetry_status, SymmetryStatus::SuppressedSideView);
        assert!(result.anomalies.iter().all(|a| a.kind != AnomalyKind::Asymmetry));
        assert!(result.measurements.stride_length_m.is_some());
        assert!(result.sagittal_metrics);
        assert!(result.measurements.peak_knee_flexion.is_some());
    }

    #[test]
    fn test_rear_view_detected() {
        let mut analyzer = GaitAnalyzer::default();
        walk(&mut analyzer, 1.0, ViewType::Rear);
        assert_eq!(analyzer.view(), ViewType::Rear);
    }

    #[test]
    fn test_configured_view_wins() {
        let mut analyzer = GaitAnalyzer::new(GaitConfig {
            view: Some(ViewType::Side),
            ..Default::default()
        });
        walk(&mut analyzer, 1.0, ViewType::Front);
        assert_eq!(analyzer.view(), ViewType::Side);
    }

    #[test]
    fn test_no_frames_is_insufficient() {
        let analyzer = GaitAnalyzer::default();
        let result = analyzer.generate_analysis_result(0.0);
        assert_eq!(result.total_strides, 0);
        assert!(result.insufficient_data);
        assert_eq!(result.overall_score, 0.0);
        assert!(result.recommendations.is_empty());
        assert_eq!(result.symmetry, None);
    }

    #[test]
    fn test_standing_still_is_insufficient() {
        let mut analyzer = GaitAnalyzer::default();
        for i in 0..90 {
            let t = i as f64 / FPS;
            analyzer.process_frame(&walking_frame(0.0, ViewType::Front), t);
        }
        let result = analyzer.generate_analysis_result(0.0);
        assert_eq!(result.total_strides, 0);
        assert!(result.insufficient_data);
        assert!((result.duration_seconds - 89.0 / FPS).abs() < 1e-9);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut analyzer = GaitAnalyzer::new(GaitConfig {
            max_frames: 10,
            ..Default::default()
        });
        walk(&mut analyzer, 1.0, ViewType::Front);
        assert_eq!(analyzer.frame_count(), 10);
        let recent = analyzer.recent_frames(3);
        assert_eq!(recent.len(), 3);
        assert!(recent[0].timestamp < recent[2].timestamp);
        assert_eq!(analyzer.recent_frames(100).len(), 10);
    }

    #[test]
    fn test_bad_frames_are_untracked() {
        let mut analyzer = GaitAnalyzer::default();
        let frame = analyzer.process_frame(&[Landmark::default(); 12], 0.0);
        assert!(!frame.tracked);

        analyzer.process_frame(&walking_frame(1.0, ViewType::Front), 1.0);
        let stale = analyzer.process_frame(&walking_frame(0.5, ViewType::Front), 0.5);
        assert!(!stale.tracked);
        assert_eq!(analyzer.frame_count(), 1);
    }

    #[test]
    fn test_stop_and_reset() {
        let mut analyzer = GaitAnalyzer::default();
        walk(&mut analyzer, 3.0, ViewType::Front);
        analyzer.stop();
        let count = analyzer.frame_count();
        let frame = analyzer.process_frame(&walking_frame(10.0, ViewType::Front), 10.0);
        assert!(!frame.tracked);
        assert_eq!(analyzer.frame_count(), count);

        analyzer.reset();
        assert!(analyzer.is_active());
        assert_eq!(analyzer.frame_count(), 0);
        assert!(analyzer.generate_analysis_result(0.0).insufficient_data);
    }
}
