//! Gait report - scoring, anomalies and recommendations
//!
//! Everything here is a pure function of the aggregated measurements.
//! Normative bands are for healthy adult walking at a comfortable pace.

use serde::Serialize;

use super::frame::{Side, ViewType};

// ============================================================================
// NORMATIVE BANDS
// ============================================================================

/// Normal walking cadence (strides per minute)
pub const CADENCE_BAND: (f32, f32) = (50.0, 62.0);
/// Stance share of the cycle (%)
pub const STANCE_BAND: (f32, f32) = (58.0, 65.0);
/// Peak knee flexion during swing (degrees)
pub const KNEE_FLEXION_BAND: (f32, f32) = (55.0, 70.0);
/// Walking speed (m/s)
pub const SPEED_BAND: (f32, f32) = (1.0, 1.5);
/// Left/right difference (%)
pub const SYMMETRY_BAND: (f32, f32) = (0.0, 5.0);

/// Score reaches 0 this far outside the band
const CADENCE_FALLOFF: f32 = 20.0;
const STANCE_FALLOFF: f32 = 15.0;
const KNEE_FALLOFF: f32 = 25.0;
const SPEED_FALLOFF: f32 = 0.6;
const SYMMETRY_FALLOFF: f32 = 15.0;

const CADENCE_WEIGHT: f32 = 0.25;
const STANCE_WEIGHT: f32 = 0.20;
const KNEE_WEIGHT: f32 = 0.20;
const SPEED_WEIGHT: f32 = 0.15;
const SYMMETRY_WEIGHT: f32 = 0.20;

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SymmetryStatus {
    Available,
    /// Side-view capture: one leg hides the other
    SuppressedSideView,
    /// A leg has no completed stride
    InsufficientData,
}

/// Left/right percentage differences
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymmetryMetrics {
    pub stride_time: f32,
    pub stance_percent: f32,
    pub knee_flexion: Option<f32>,
    /// Largest of the available differences
    pub overall: f32,
}

/// Share of tracked leg-time in each phase (%)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseBreakdown {
    pub stance: f32,
    pub swing: f32,
    pub double_support: f32,
}

/// Averages over one leg's (or both legs') cycles
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaitMeasurements {
    pub strides: u32,
    pub cadence: f32,
    pub stride_time: f32,
    pub stance_percent: f32,
    pub swing_percent: f32,
    pub double_support_percent: f32,
    pub stride_length_m: Option<f32>,
    pub speed_mps: Option<f32>,
    pub peak_knee_flexion: Option<f32>,
    pub knee_rom: Option<f32>,
    pub hip_rom: Option<f32>,
    pub ankle_rom: Option<f32>,
    /// Mean trunk inclination from vertical
    pub trunk_lean: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnomalyKind {
    Asymmetry,
    SlowCadence,
    ShortStride,
    SlowSpeed,
    ReducedKneeFlexion,
    ProlongedStance,
    ExcessiveDoubleSupport,
    TrunkLean,
}

impl AnomalyKind {
    pub fn key(&self) -> &'static str {
        match self {
            AnomalyKind::Asymmetry => "gait.anomaly.asymmetry",
            AnomalyKind::SlowCadence => "gait.anomaly.slowCadence",
            AnomalyKind::ShortStride => "gait.anomaly.shortStride",
            AnomalyKind::SlowSpeed => "gait.anomaly.slowSpeed",
            AnomalyKind::ReducedKneeFlexion => "gait.anomaly.reducedKneeFlexion",
            AnomalyKind::ProlongedStance => "gait.anomaly.prolongedStance",
            AnomalyKind::ExcessiveDoubleSupport => "gait.anomaly.excessiveDoubleSupport",
            AnomalyKind::TrunkLean => "gait.anomaly.trunkLean",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaitAnomaly {
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub side: Option<Side>,
    pub value: f32,
    pub key: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl From<Severity> for Priority {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Mild => Priority::Low,
            Severity::Moderate => Priority::Medium,
            Severity::Severe => Priority::High,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendationKind {
    BalanceTraining,
    StrengthTraining,
    CadenceDrills,
    MobilityWork,
    ConsultProfessional,
    MaintainRoutine,
}

impl RecommendationKind {
    pub fn key(&self) -> &'static str {
        match self {
            RecommendationKind::BalanceTraining => "gait.recommendation.balanceTraining",
            RecommendationKind::StrengthTraining => "gait.recommendation.strengthTraining",
            RecommendationKind::CadenceDrills => "gait.recommendation.cadenceDrills",
            RecommendationKind::MobilityWork => "gait.recommendation.mobilityWork",
            RecommendationKind::ConsultProfessional => "gait.recommendation.consultProfessional",
            RecommendationKind::MaintainRoutine => "gait.recommendation.maintainRoutine",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub key: &'static str,
}

/// Finalized session result
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaitAnalysisResult {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub created_at: f64,
    pub view: ViewType,
    pub duration_seconds: f64,
    pub total_strides: u32,
    /// No completed stride: nothing below is meaningful
    pub insufficient_data: bool,
    /// Stride length, speed and joint ranges were measured (side view);
    /// otherwise they are null and left out of scoring
    pub sagittal_metrics: bool,
    pub overall_score: f32,
    pub phase_breakdown: PhaseBreakdown,
    pub measurements: GaitMeasurements,
    pub left: GaitMeasurements,
    pub right: GaitMeasurements,
    pub symmetry: Option<SymmetryMetrics>,
    pub symmetry_status: SymmetryStatus,
    pub anomalies: Vec<GaitAnomaly>,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// SCORING
// ============================================================================

/// 100 inside `[lo, hi]`, falling linearly to 0 at `falloff` outside it
pub fn band_score(value: f32, band: (f32, f32), falloff: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let distance = if value < band.0 {
        band.0 - value
    } else if value > band.1 {
        value - band.1
    } else {
        0.0
    };
    (1.0 - distance / falloff).clamp(0.0, 1.0) * 100.0
}

/// Relative difference in percent of the mean (0 when both are 0)
pub fn percent_difference(left: f32, right: f32) -> f32 {
    let mean = (left + right) / 2.0;
    if mean.abs() < f32::EPSILON {
        return 0.0;
    }
    (left - right).abs() / mean.abs() * 100.0
}

pub fn symmetry(left: &GaitMeasurements, right: &GaitMeasurements) -> SymmetryMetrics {
    let stride_time = percent_difference(left.stride_time, right.stride_time);
    let stance_percent = percent_difference(left.stance_percent, right.stance_percent);
    let knee_flexion = match (left.peak_knee_flexion, right.peak_knee_flexion) {
        (Some(l), Some(r)) => Some(percent_difference(l, r)),
        _ => None,
    };
    let overall = [Some(stride_time), Some(stance_percent), knee_flexion]
        .into_iter()
        .flatten()
        .fold(0.0, f32::max);
    SymmetryMetrics {
        stride_time,
        stance_percent,
        knee_flexion,
        overall,
    }
}

/// Weighted mean of the component scores available for this session
pub fn overall_score(measurements: &GaitMeasurements, symmetry: Option<&SymmetryMetrics>) -> f32 {
    if measurements.strides == 0 {
        return 0.0;
    }
    let components = [
        Some((band_score(measurements.cadence, CADENCE_BAND, CADENCE_FALLOFF), CADENCE_WEIGHT)),
        Some((band_score(measurements.stance_percent, STANCE_BAND, STANCE_FALLOFF), STANCE_WEIGHT)),
        measurements
            .peak_knee_flexion
            .map(|k| (band_score(k, KNEE_FLEXION_BAND, KNEE_FALLOFF), KNEE_WEIGHT)),
        measurements
            .speed_mps
            .map(|s| (band_score(s, SPEED_BAND, SPEED_FALLOFF), SPEED_WEIGHT)),
        symmetry.map(|s| (band_score(s.overall, SYMMETRY_BAND, SYMMETRY_FALLOFF), SYMMETRY_WEIGHT)),
    ];

    let (sum, weight) = components
        .into_iter()
        .flatten()
        .fold((0.0, 0.0), |(sum, weight), (score, w)| (sum + score * w, weight + w));
    if weight > 0.0 {
        sum / weight
    } else {
        0.0
    }
}

// ============================================================================
// ANOMALIES
// ============================================================================

/// Severity tier for a value beyond `[mild, moderate, severe]` limits
///
/// `above` selects whether larger values are worse.
fn tier(value: f32, limits: [f32; 3], above: bool) -> Option<Severity> {
    let beyond = |limit: f32| if above { value > limit } else { value < limit };
    if !value.is_finite() {
        None
    } else if beyond(limits[2]) {
        Some(Severity::Severe)
    } else if beyond(limits[1]) {
        Some(Severity::Moderate)
    } else if beyond(limits[0]) {
        Some(Severity::Mild)
    } else {
        None
    }
}

fn anomaly(kind: AnomalyKind, severity: Severity, side: Option<Side>, value: f32) -> GaitAnomaly {
    GaitAnomaly {
        kind,
        severity,
        side,
        value,
        key: kind.key(),
    }
}

pub fn detect_anomalies(
    measurements: &GaitMeasurements,
    left: &GaitMeasurements,
    right: &GaitMeasurements,
    symmetry: Option<&SymmetryMetrics>,
) -> Vec<GaitAnomaly> {
    let mut found = Vec::new();
    if measurements.strides == 0 {
        return found;
    }

    if let Some(sym) = symmetry {
        if let Some(severity) = tier(sym.overall, [10.0, 20.0, 30.0], true) {
            // The protected leg spends less time loaded
            let side = if left.stance_percent < right.stance_percent {
                Side::Left
            } else {
                Side::Right
            };
            found.push(anomaly(AnomalyKind::Asymmetry, severity, Some(side), sym.overall));
        }
    }

    if let Some(severity) = tier(measurements.cadence, [50.0, 42.0, 35.0], false) {
        found.push(anomaly(AnomalyKind::SlowCadence, severity, None, measurements.cadence));
    }

    if let Some(stride) = measurements.stride_length_m {
        if let Some(severity) = tier(stride, [1.0, 0.8, 0.6], false) {
            found.push(anomaly(AnomalyKind::ShortStride, severity, None, stride));
        }
    }
    if let Some(speed) = measurements.speed_mps {
        if let Some(severity) = tier(speed, [1.0, 0.8, 0.6], false) {
            found.push(anomaly(AnomalyKind::SlowSpeed, severity, None, speed));
        }
    }

    for (side, leg) in [(Side::Left, left), (Side::Right, right)] {
        if leg.strides == 0 {
            continue;
        }
        if let Some(flexion) = leg.peak_knee_flexion {
            if let Some(severity) = tier(flexion, [KNEE_FLEXION_BAND.0, 45.0, 35.0], false) {
                found.push(anomaly(AnomalyKind::ReducedKneeFlexion, severity, Some(side), flexion));
            }
        }
    }

    if let Some(severity) = tier(measurements.stance_percent, [STANCE_BAND.1, 70.0, 75.0], true) {
        found.push(anomaly(AnomalyKind::ProlongedStance, severity, None, measurements.stance_percent));
    }
    if let Some(severity) = tier(measurements.double_support_percent, [25.0, 30.0, 35.0], true) {
        found.push(anomaly(
            AnomalyKind::ExcessiveDoubleSupport,
            severity,
            None,
            measurements.double_support_percent,
        ));
    }
    if let Some(lean) = measurements.trunk_lean {
        if let Some(severity) = tier(lean, [10.0, 15.0, 20.0], true) {
            found.push(anomaly(AnomalyKind::TrunkLean, severity, None, lean));
        }
    }

    found
}

// ============================================================================
// RECOMMENDATIONS
// ============================================================================

fn advice_for(kind: AnomalyKind) -> RecommendationKind {
    match kind {
        AnomalyKind::Asymmetry | AnomalyKind::ProlongedStance | AnomalyKind::ExcessiveDoubleSupport => {
            RecommendationKind::BalanceTraining
        }
        AnomalyKind::SlowCadence => RecommendationKind::CadenceDrills,
        AnomalyKind::ShortStride | AnomalyKind::SlowSpeed | AnomalyKind::TrunkLean => {
            RecommendationKind::StrengthTraining
        }
        AnomalyKind::ReducedKneeFlexion => RecommendationKind::MobilityWork,
    }
}

/// One entry per advice kind at the highest priority any anomaly asks for,
/// highest priority first
pub fn recommendations(anomalies: &[GaitAnomaly]) -> Vec<Recommendation> {
    let mut out: Vec<Recommendation> = Vec::new();
    let mut push = |kind: RecommendationKind, priority: Priority| {
        match out.iter_mut().find(|r| r.kind == kind) {
            Some(existing) => existing.priority = existing.priority.max(priority),
            None => out.push(Recommendation {
                kind,
                priority,
                key: kind.key(),
            }),
        }
    };

    for a in anomalies {
        push(advice_for(a.kind), a.severity.into());
    }
    if anomalies.iter().any(|a| a.severity == Severity::Severe) {
        push(RecommendationKind::ConsultProfessional, Priority::High);
    }
    if anomalies.is_empty() {
        push(RecommendationKind::MaintainRoutine, Priority::Low);
    }

    out.sort_by(|a, b| b.priority.cmp(&a.priority));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> GaitMeasurements {
        GaitMeasurements {
            strides: 6,
            cadence: 55.0,
            stride_time: 1.09,
            stance_percent: 61.0,
            swing_percent: 39.0,
            double_support_percent: 20.0,
            stride_length_m: Some(1.35),
            speed_mps: Some(1.25),
            peak_knee_flexion: Some(62.0),
            knee_rom: Some(60.0),
            hip_rom: Some(40.0),
            ankle_rom: Some(25.0),
            trunk_lean: Some(4.0),
        }
    }

    #[test]
    fn test_band_score() {
        assert_eq!(band_score(55.0, CADENCE_BAND, CADENCE_FALLOFF), 100.0);
        assert_eq!(band_score(40.0, CADENCE_BAND, CADENCE_FALLOFF), 50.0);
        assert_eq!(band_score(10.0, CADENCE_BAND, CADENCE_FALLOFF), 0.0);
        assert_eq!(band_score(f32::NAN, CADENCE_BAND, CADENCE_FALLOFF), 0.0);
    }

    #[test]
    fn test_score_is_monotonic_in_deviation() {
        let mut m = healthy();
        let mut last = overall_score(&m, None);
        assert!((last - 100.0).abs() < 1e-3);
        for cadence in [48.0, 44.0, 38.0, 30.0] {
            m.cadence = cadence;
            let score = overall_score(&m, None);
            assert!(score < last);
            last = score;
        }
    }

    #[test]
    fn test_no_strides_scores_zero() {
        let m = GaitMeasurements::default();
        assert_eq!(overall_score(&m, None), 0.0);
        assert!(detect_anomalies(&m, &m, &m, None).is_empty());
    }

    #[test]
    fn test_symmetry_difference() {
        let left = GaitMeasurements {
            stride_time: 1.0,
            stance_percent: 60.0,
            peak_knee_flexion: Some(60.0),
            ..healthy()
        };
        let right = GaitMeasurements {
            stride_time: 1.0,
            stance_percent: 60.0,
            peak_knee_flexion: Some(40.0),
            ..healthy()
        };
        let sym = symmetry(&left, &right);
        assert_eq!(sym.stride_time, 0.0);
        assert!((sym.knee_flexion.unwrap() - 40.0).abs() < 1e-3);
        assert!((sym.overall - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_asymmetry_severity_tiers() {
        let m = healthy();
        let sym = |overall| SymmetryMetrics {
            stride_time: overall,
            stance_percent: 0.0,
            knee_flexion: None,
            overall,
        };
        let severity = |overall| {
            detect_anomalies(&m, &m, &m, Some(&sym(overall)))
                .into_iter()
                .find(|a| a.kind == AnomalyKind::Asymmetry)
                .map(|a| a.severity)
        };
        assert_eq!(severity(5.0), None);
        assert_eq!(severity(12.0), Some(Severity::Mild));
        assert_eq!(severity(25.0), Some(Severity::Moderate));
        assert_eq!(severity(35.0), Some(Severity::Severe));
    }

    #[test]
    fn test_healthy_walk_keeps_routine() {
        let m = healthy();
        let anomalies = detect_anomalies(&m, &m, &m, None);
        assert!(anomalies.is_empty(), "{:?}", anomalies);
        let recs = recommendations(&anomalies);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::MaintainRoutine);
        assert_eq!(recs[0].key, "gait.recommendation.maintainRoutine");
    }

    #[test]
    fn test_recommendations_merge_by_priority() {
        let m = GaitMeasurements {
            cadence: 30.0,
            stance_percent: 67.0,
            double_support_percent: 32.0,
            ..healthy()
        };
        let anomalies = detect_anomalies(&m, &m, &m, None);
        let recs = recommendations(&anomalies);
        assert_eq!(recs[0].priority, Priority::High);
        let balance: Vec<_> = recs
            .iter()
            .filter(|r| r.kind == RecommendationKind::BalanceTraining)
            .collect();
        assert_eq!(balance.len(), 1);
        assert_eq!(balance[0].priority, Priority::Medium);
        assert!(recs.iter().any(|r| r.kind == RecommendationKind::ConsultProfessional));
    }
}
