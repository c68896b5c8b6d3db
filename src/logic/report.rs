//! Report Exporter
//!
//! Pure, stateless transforms of (detection log, metrics snapshot) into
//! the two textual report formats the dashboard offers for download.

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use thiserror::Error;

use crate::logic::detection::DetectionEvent;
use crate::logic::metrics::PerformanceMetrics;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// CSV header, fixed column order.
const CSV_HEADER: &str = "ID,Type,Timestamp,Confidence,Source,Result";

/// Render the record log as a CSV table, newest first as given.
///
/// Values are joined verbatim; none of the generated fields can contain
/// a comma, so no delimiter escaping is performed.
pub fn to_csv(events: &[DetectionEvent]) -> String {
    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for event in events {
        lines.push(format!(
            "{},{},{},{:.2},{},{}",
            event.id,
            event.threat,
            event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            event.confidence,
            event.source,
            event.verdict,
        ));
    }

    lines.join("\n")
}

/// Render the full report as a pretty-printed JSON document:
/// `{generatedAt, metrics, events}`.
pub fn to_json(
    events: &[DetectionEvent],
    metrics: &PerformanceMetrics,
) -> Result<String, ReportError> {
    let report = json!({
        "generatedAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "metrics": metrics,
        "events": events,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}
