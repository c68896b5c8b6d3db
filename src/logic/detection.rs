//! Detection Records & Bounded Log
//!
//! Immutable detection records plus the newest-first log the dashboard
//! reads. The log keeps the 50 most recent records and evicts beyond
//! that.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DETECTION_LOG_CAP;
use crate::logic::threat::{ThreatType, Verdict};

// ============================================================================
// DETECTION EVENT
// ============================================================================

/// One finalized analysis outcome. Immutable once created.
///
/// Field names on the wire match the dashboard's JSON (`type`, `result`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub threat: ThreatType,
    pub timestamp: DateTime<Utc>,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    /// Synthetic origin address, dotted-quad.
    pub source: String,
    #[serde(rename = "result")]
    pub verdict: Verdict,
}

impl DetectionEvent {
    fn new(threat: ThreatType, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            threat,
            timestamp: Utc::now(),
            confidence,
            source: random_source(),
            verdict: threat.verdict(),
        }
    }

    /// Record synthesized at the end of a full analysis run.
    pub fn from_analysis(threat: ThreatType) -> Self {
        Self::new(threat, threat.analysis_confidence())
    }

    /// Record manufactured by the live feed simulator.
    pub fn from_feed(threat: ThreatType) -> Self {
        Self::new(threat, threat.feed_confidence())
    }

    /// Whether the verdict matches ground truth for this category:
    /// threats blocked, safe traffic allowed.
    pub fn is_correct(&self) -> bool {
        (self.verdict == Verdict::Blocked && self.threat != ThreatType::Safe)
            || (self.verdict == Verdict::Allowed && self.threat == ThreatType::Safe)
    }
}

/// Synthetic source address in the demo's 192.168.0.0/16 range.
fn random_source() -> String {
    let mut rng = rand::thread_rng();
    format!("192.168.{}.{}", rng.gen_range(0..255), rng.gen_range(0..255))
}

// ============================================================================
// DETECTION LOG
// ============================================================================

/// Bounded newest-first record log.
#[derive(Debug, Clone, Default)]
pub struct DetectionLog {
    entries: VecDeque<DetectionEvent>,
}

impl DetectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the front, evicting the oldest beyond the cap.
    pub fn push(&mut self, event: DetectionEvent) {
        self.entries.push_front(event);
        self.entries.truncate(DETECTION_LOG_CAP);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest-first copy for the presentation layer and exporters.
    pub fn snapshot(&self) -> Vec<DetectionEvent> {
        self.entries.iter().cloned().collect()
    }

    pub fn newest(&self) -> Option<&DetectionEvent> {
        self.entries.front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_verdict_follows_category() {
        let event = DetectionEvent::from_analysis(ThreatType::Malware);
        assert_eq!(event.verdict, Verdict::Blocked);
        assert!(event.is_correct());

        let event = DetectionEvent::from_feed(ThreatType::Safe);
        assert_eq!(event.verdict, Verdict::Allowed);
        assert!(event.is_correct());

        let event = DetectionEvent::from_feed(ThreatType::Phishing);
        assert_eq!(event.verdict, Verdict::Flagged);
        assert!(!event.is_correct());
    }

    #[test]
    fn test_event_ids_unique() {
        let a = DetectionEvent::from_analysis(ThreatType::Safe);
        let b = DetectionEvent::from_analysis(ThreatType::Safe);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_event_wire_format() {
        let event = DetectionEvent::from_analysis(ThreatType::Malware);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(json["type"], "malware");
        assert_eq!(json["result"], "blocked");
        assert!(json.get("threat").is_none());
    }

    #[test]
    fn test_log_caps_at_fifty_newest_first() {
        let mut log = DetectionLog::new();
        let mut last_id = None;

        for _ in 0..55 {
            let event = DetectionEvent::from_feed(ThreatType::Ddos);
            last_id = Some(event.id);
            log.push(event);
        }

        assert_eq!(log.len(), DETECTION_LOG_CAP);
        assert_eq!(log.newest().unwrap().id, last_id.unwrap());

        // Insertion order preserved newest-first.
        let snapshot = log.snapshot();
        for pair in snapshot.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }
}
