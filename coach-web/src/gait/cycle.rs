//! Gait cycle tracker - heel strike to heel strike for one leg

use serde::Serialize;

use super::frame::{GaitPhase, JointAngles, Side};

/// One completed stride of one leg
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaitCycle {
    pub side: Side,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub stance_seconds: f64,
    pub swing_seconds: f64,
    pub double_support_seconds: f64,
    pub stance_percent: f32,
    pub swing_percent: f32,
    pub double_support_percent: f32,
    /// Strides per minute
    pub cadence: f32,
    /// Heel displacement between the two strikes, in frame-height units
    pub stride_units: f32,
    pub stride_length_m: Option<f32>,
    pub speed_mps: Option<f32>,
    pub knee_rom: Option<f32>,
    pub hip_rom: Option<f32>,
    pub ankle_rom: Option<f32>,
    pub peak_knee_flexion: Option<f32>,
}

impl GaitCycle {
    /// Fill in metric stride length and speed from a meters-per-unit scale
    pub fn apply_scale(&mut self, meters_per_unit: f32) {
        let stride = self.stride_units * meters_per_unit;
        self.stride_length_m = Some(stride);
        self.speed_mps = Some(stride / self.duration as f32);
    }

    /// Drop joint ranges, which are not measurable outside the sagittal plane
    pub fn clear_joint_ranges(&mut self) {
        self.knee_rom = None;
        self.hip_rom = None;
        self.ankle_rom = None;
        self.peak_knee_flexion = None;
    }
}

/// Min/max of a signal over a cycle
#[derive(Clone, Copy, Debug, Default)]
struct Extent {
    min: Option<f32>,
    max: Option<f32>,
}

impl Extent {
    fn add(&mut self, value: Option<f32>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.min = Some(self.min.map_or(v, |m| m.min(v)));
            self.max = Some(self.max.map_or(v, |m| m.max(v)));
        }
    }

    fn range(&self) -> Option<f32> {
        Some(self.max? - self.min?)
    }
}

struct OpenCycle {
    start: f64,
    start_x: f32,
    stance: f64,
    swing: f64,
    double_support: f64,
    knee: Extent,
    hip: Extent,
    ankle: Extent,
}

impl OpenCycle {
    fn new(start: f64, start_x: f32) -> Self {
        Self {
            start,
            start_x,
            stance: 0.0,
            swing: 0.0,
            double_support: 0.0,
            knee: Extent::default(),
            hip: Extent::default(),
            ankle: Extent::default(),
        }
    }
}

pub struct CycleTracker {
    side: Side,
    min_stride_seconds: f64,
    max_stride_seconds: f64,
    open: Option<OpenCycle>,
    last_observed: Option<f64>,
    cycles: Vec<GaitCycle>,
    discarded: u32,
}

impl CycleTracker {
    pub fn new(side: Side, min_stride_seconds: f64, max_stride_seconds: f64) -> Self {
        Self {
            side,
            min_stride_seconds,
            max_stride_seconds,
            open: None,
            last_observed: None,
            cycles: Vec::new(),
            discarded: 0,
        }
    }

    pub fn cycles(&self) -> &[GaitCycle] {
        &self.cycles
    }

    /// Cycles dropped as pauses
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    /// Account the time since the previous frame to the open cycle
    pub fn observe(&mut self, t: f64, phase: GaitPhase, angles: &JointAngles) {
        let dt = match self.last_observed {
            Some(last) if t > last => t - last,
            Some(_) => return,
            None => 0.0,
        };
        self.last_observed = Some(t);

        let Some(open) = self.open.as_mut() else {
            return;
        };
        if phase.is_loaded() {
            open.stance += dt;
        }
        match phase {
            GaitPhase::DoubleSupport => open.double_support += dt,
            GaitPhase::Swing => open.swing += dt,
            GaitPhase::Stance | GaitPhase::Unknown => {}
        }
        open.knee.add(angles.knee);
        open.hip.add(angles.hip);
        open.ankle.add(angles.ankle);
    }

    /// Close the open cycle (if any) and start a new one
    ///
    /// Returns the completed cycle. Strikes too close to the cycle start are
    /// ignored; cycles longer than the pause limit are discarded.
    pub fn heel_strike(&mut self, t: f64, heel_x: f32) -> Option<&GaitCycle> {
        let Some(open) = self.open.take() else {
            self.open = Some(OpenCycle::new(t, heel_x));
            return None;
        };

        let duration = t - open.start;
        if duration < self.min_stride_seconds {
            self.open = Some(open);
            return None;
        }
        self.open = Some(OpenCycle::new(t, heel_x));

        if duration > self.max_stride_seconds {
            log::debug!("{:?} cycle of {:.2}s discarded as a pause", self.side, duration);
            self.discarded += 1;
            return None;
        }

        let percent = |seconds: f64| (seconds / duration * 100.0) as f32;
        let cycle = GaitCycle {
            side: self.side,
            start: open.start,
            end: t,
            duration,
            stance_seconds: open.stance,
            swing_seconds: open.swing,
            double_support_seconds: open.double_support,
            stance_percent: percent(open.stance),
            swing_percent: percent(open.swing),
            double_support_percent: percent(open.double_support),
            cadence: (60.0 / duration) as f32,
            stride_units: (heel_x - open.start_x).abs(),
            stride_length_m: None,
            speed_mps: None,
            knee_rom: open.knee.range(),
            hip_rom: open.hip.range(),
            ankle_rom: open.ankle.range(),
            // Smallest knee angle is the deepest flexion
            peak_knee_flexion: open.knee.min.map(|k| 180.0 - k),
        };
        log::debug!(
            "{:?} stride: {:.2}s, stance {:.0}%",
            self.side,
            cycle.duration,
            cycle.stance_percent
        );
        self.cycles.push(cycle);
        self.cycles.last()
    }
}
