//! AI Threat Detection Demo - Simulation Core
//!
//! The stateful core behind the demo dashboard: a scenario runner that
//! walks a fixed five-stage analysis pipeline on timers, a rolling
//! metrics aggregator, and a simulated live feed. No real capture, no
//! real inference; the presentation layer reads everything through
//! [`DemoEngine`] accessors.

pub mod constants;
pub mod logic;

pub use logic::detection::{DetectionEvent, DetectionLog};
pub use logic::engine::DemoEngine;
pub use logic::metrics::PerformanceMetrics;
pub use logic::notify::EngineNotice;
pub use logic::pipeline::{AnalysisStage, StageId, StageStatus};
pub use logic::session::SessionStore;
pub use logic::threat::{CueSeverity, ThreatType, Verdict};
