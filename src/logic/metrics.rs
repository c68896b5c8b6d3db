//! Performance Metrics Aggregator
//!
//! Running aggregates over the detection record stream. Every update is
//! O(1) from the previous snapshot plus one record; nothing is ever
//! recomputed from history, so float drift over a long session is
//! accepted.

use serde::{Deserialize, Serialize};

use crate::logic::detection::DetectionEvent;
use crate::logic::threat::{ThreatType, Verdict};

/// Rolling metrics snapshot the dashboard renders.
///
/// Serialized camelCase to match the dashboard's report format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Average end-to-end analysis latency in milliseconds. Only records
    /// produced by a full analysis run carry a latency; feed records do
    /// not touch this average.
    pub detection_latency: f64,
    /// Running classification accuracy, percent.
    pub accuracy: f64,
    pub total_detections: u64,
    pub threats_blocked: u64,
    pub false_positives: u64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            detection_latency: 0.0,
            accuracy: 100.0,
            total_detections: 0,
            threats_blocked: 0,
            false_positives: 0,
        }
    }
}

impl PerformanceMetrics {
    /// Fold one record into the snapshot.
    ///
    /// `latency_ms` is present only on the analysis-run path.
    pub fn record(&mut self, event: &DetectionEvent, latency_ms: Option<u64>) {
        let n = self.total_detections as f64;

        if let Some(latency) = latency_ms {
            self.detection_latency =
                (self.detection_latency * n + latency as f64) / (n + 1.0);
        }

        let correct = if event.is_correct() { 100.0 } else { 0.0 };
        self.accuracy = (self.accuracy * n + correct) / (n + 1.0);

        self.total_detections += 1;
        if event.verdict == Verdict::Blocked {
            self.threats_blocked += 1;
        }
        if event.verdict == Verdict::Flagged && event.threat == ThreatType::Safe {
            self.false_positives += 1;
        }
    }
}
