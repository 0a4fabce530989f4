//! Gait module - walking analysis from a pose landmark stream
//!
//! Organized into submodules:
//! - frame: per-frame phase and joint angle types
//! - config: tunables
//! - contact: per-leg ground contact and heel strike detection
//! - cycle: heel strike to heel strike stride measurements
//! - analyzer: frame ingestion, view detection, session aggregation
//! - report: scoring, anomalies, recommendations

mod analyzer;
mod config;
mod contact;
mod cycle;
mod frame;
mod report;

pub use analyzer::{detect_view, GaitAnalyzer, SIDE_VIEW_RATIO};
pub use config::GaitConfig;
pub use contact::{FootSample, FootTracker};
pub use cycle::{CycleTracker, GaitCycle};
pub use frame::{GaitFrame, GaitPhase, JointAngles, LegFrame, Side, ViewType};
pub use report::{
    band_score, percent_difference, AnomalyKind, GaitAnalysisResult, GaitAnomaly, GaitMeasurements,
    PhaseBreakdown, Priority, Recommendation, RecommendationKind, Severity, SymmetryMetrics,
    SymmetryStatus,
};
