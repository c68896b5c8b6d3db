//! Change Notifications
//!
//! Broadcast channel the presentation layer subscribes to so it can
//! re-read engine state reactively instead of polling. Sends with no
//! live subscriber are dropped without error.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::logic::pipeline::{StageId, StageStatus};
use crate::logic::threat::ThreatType;
use uuid::Uuid;

/// Capacity of the notice channel; a slow subscriber lags, it never
/// blocks the engine.
const NOTICE_CAPACITY: usize = 64;

/// One state-change notice.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineNotice {
    RunStarted { threat: ThreatType },
    StageUpdated { stage: StageId, status: StageStatus },
    RunFinished { threat: ThreatType, latency_ms: u64 },
    DetectionAdded { id: Uuid },
    FeedConnected,
    FeedDisconnected,
}

/// Thin wrapper around the broadcast sender.
#[derive(Debug)]
pub struct Notifier {
    tx: broadcast::Sender<EngineNotice>,
}

impl Default for Notifier {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(NOTICE_CAPACITY);
        Self { tx }
    }
}

impl Notifier {
    pub fn subscribe(&self) -> broadcast::Receiver<EngineNotice> {
        self.tx.subscribe()
    }

    /// Emit a notice to all listeners. Silent no-op when nobody listens.
    pub fn emit(&self, notice: EngineNotice) {
        let _ = self.tx.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let notifier = Notifier::default();
        notifier.emit(EngineNotice::FeedConnected);
    }

    #[tokio::test]
    async fn test_subscriber_receives_notices() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.emit(EngineNotice::RunStarted { threat: ThreatType::Malware });
        notifier.emit(EngineNotice::StageUpdated {
            stage: StageId::Capture,
            status: StageStatus::Processing,
        });

        match rx.recv().await.unwrap() {
            EngineNotice::RunStarted { threat } => assert_eq!(threat, ThreatType::Malware),
            other => panic!("unexpected notice: {:?}", other),
        }
        match rx.recv().await.unwrap() {
            EngineNotice::StageUpdated { stage, status } => {
                assert_eq!(stage, StageId::Capture);
                assert_eq!(status, StageStatus::Processing);
            }
            other => panic!("unexpected notice: {:?}", other),
        }
    }
}
