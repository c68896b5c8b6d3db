//! Live Feed Simulator
//!
//! Background generator of synthetic detection records, emulating an
//! external event feed. Emissions are randomly spaced within the
//! configured window; each tick manufactures one record for a uniformly
//! random category and pushes it through the engine's shared ingest
//! path (no latency contribution).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tokio::task::JoinHandle;

use crate::constants::feed_delay_window;
use crate::logic::detection::DetectionEvent;
use crate::logic::engine::EngineInner;
use crate::logic::threat::ThreatType;

pub struct FeedSimulator {
    connected: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FeedSimulator {
    pub(crate) fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Begin emitting. Returns false when already connected (idempotent).
    pub(crate) fn start(&self, inner: &Arc<EngineInner>) -> bool {
        if self.connected.swap(true, Ordering::SeqCst) {
            return false;
        }

        log::info!("Live feed connected");
        let inner = Arc::clone(inner);
        let handle = tokio::spawn(async move {
            loop {
                let delay = {
                    let (min, max) = feed_delay_window();
                    Duration::from_millis(rand::thread_rng().gen_range(min..max))
                };
                tokio::time::sleep(delay).await;

                if !inner.feed().is_connected() {
                    break;
                }

                let event = DetectionEvent::from_feed(ThreatType::random());
                log::debug!("Feed tick: {} from {}", event.threat, event.source);
                inner.ingest_feed(event);
            }
        });
        *self.task.lock() = Some(handle);
        true
    }

    /// Stop emitting, cancelling the pending tick. Returns false when
    /// already stopped (idempotent). Records already emitted stay.
    pub(crate) fn stop(&self) -> bool {
        if !self.connected.swap(false, Ordering::SeqCst) {
            return false;
        }

        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
        log::info!("Live feed disconnected");
        true
    }
}
