//! Analysis Pipeline Stages
//!
//! The fixed five-stage sequence a triggered run walks through.
//! The stage set is closed, so stages are an enum rather than
//! string identifiers looked up at runtime.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// STAGE IDENTITY
// ============================================================================

/// Identity of one pipeline stage, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    Capture,
    Extraction,
    Inference,
    Classification,
    Response,
}

impl StageId {
    /// All stages in execution order.
    pub const ALL: [StageId; 5] = [
        StageId::Capture,
        StageId::Extraction,
        StageId::Inference,
        StageId::Classification,
        StageId::Response,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Capture => "capture",
            StageId::Extraction => "extraction",
            StageId::Inference => "inference",
            StageId::Classification => "classification",
            StageId::Response => "response",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StageId::Capture => "Packet Capture",
            StageId::Extraction => "Feature Extraction",
            StageId::Inference => "AI Model Inference",
            StageId::Classification => "Threat Classification",
            StageId::Response => "Automated Response",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StageId::Capture => "Intercepting network traffic",
            StageId::Extraction => "Analyzing patterns",
            StageId::Inference => "Neural network processing",
            StageId::Classification => "Determining threat level",
            StageId::Response => "Executing security policy",
        }
    }

    /// Nominal duration of this stage.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms())
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            StageId::Capture => 800,
            StageId::Extraction => 1000,
            StageId::Inference => 1200,
            StageId::Classification => 600,
            StageId::Response => 400,
        }
    }

    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

/// Total nominal duration of one full run.
pub fn total_duration() -> Duration {
    StageId::ALL.iter().map(|s| s.duration()).sum()
}

// ============================================================================
// STAGE STATUS
// ============================================================================

/// Status of one stage within a run. Transitions are strictly forward
/// and each stage is visited at most once per run.
///
/// `Warning` is part of the stage vocabulary but currently has no
/// producer; no analysis path marks a stage as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Processing,
    Complete,
    Warning,
}

// ============================================================================
// STAGE SNAPSHOT
// ============================================================================

/// One stage as the presentation layer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisStage {
    pub id: StageId,
    pub title: String,
    pub description: String,
    pub status: StageStatus,
    pub duration_ms: u64,
}

impl AnalysisStage {
    fn pending(id: StageId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            description: id.description().to_string(),
            status: StageStatus::Pending,
            duration_ms: id.duration_ms(),
        }
    }
}

/// Fresh stage set, all pending. Recreated at the start of each run.
pub fn fresh_stages() -> Vec<AnalysisStage> {
    StageId::ALL.iter().map(|&id| AnalysisStage::pending(id)).collect()
}
