//! Threat Types
//!
//! Core types for the demo threat taxonomy.
//! No logic beyond the fixed category -> outcome mapping.

use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// THREAT CATEGORIES
// ============================================================================

/// The closed set of scenario categories a run can be triggered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatType {
    Malware,
    Phishing,
    Ddos,
    Insider,
    Safe,
}

impl ThreatType {
    /// All categories, in selection order.
    pub const ALL: [ThreatType; 5] = [
        ThreatType::Malware,
        ThreatType::Phishing,
        ThreatType::Ddos,
        ThreatType::Insider,
        ThreatType::Safe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatType::Malware => "malware",
            ThreatType::Phishing => "phishing",
            ThreatType::Ddos => "ddos",
            ThreatType::Insider => "insider",
            ThreatType::Safe => "safe",
        }
    }

    /// Pick a category uniformly at random (feed simulator ticks).
    pub fn random() -> Self {
        let idx = rand::thread_rng().gen_range(0..Self::ALL.len());
        Self::ALL[idx]
    }

    /// Fixed category -> verdict mapping shared by the scenario runner
    /// and the feed simulator.
    pub fn verdict(&self) -> Verdict {
        match self {
            ThreatType::Safe => Verdict::Allowed,
            ThreatType::Malware => Verdict::Blocked,
            _ => Verdict::Flagged,
        }
    }

    /// Audio cue severity for a completed run of this category.
    pub fn cue_severity(&self) -> CueSeverity {
        match self {
            ThreatType::Safe => CueSeverity::Safe,
            ThreatType::Malware | ThreatType::Ddos => CueSeverity::High,
            ThreatType::Phishing | ThreatType::Insider => CueSeverity::Low,
        }
    }

    /// Confidence band for a record produced by a full analysis run.
    /// Safe traffic scores a fixed low confidence; threats land in
    /// [0.85, 0.97).
    pub fn analysis_confidence(&self) -> f64 {
        match self {
            ThreatType::Safe => 0.15,
            _ => 0.85 + rand::thread_rng().gen::<f64>() * 0.12,
        }
    }

    /// Confidence band for a record manufactured by the live feed.
    /// Wider and lower than the analysis band: [0.70, 0.95).
    pub fn feed_confidence(&self) -> f64 {
        match self {
            ThreatType::Safe => 0.10,
            _ => 0.70 + rand::thread_rng().gen::<f64>() * 0.25,
        }
    }
}

impl std::fmt::Display for ThreatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VERDICT
// ============================================================================

/// Outcome of one analysis, fixed per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Allowed,
    Blocked,
    Flagged,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Allowed => "allowed",
            Verdict::Blocked => "blocked",
            Verdict::Flagged => "flagged",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CUE SEVERITY
// ============================================================================

/// Severity tier the audio collaborator keys its cue on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueSeverity {
    Safe,
    Low,
    High,
}
