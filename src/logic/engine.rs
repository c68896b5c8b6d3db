//! Demo Engine - Owned State Container
//!
//! Single owner of all mutable demo state: the scenario runner, the
//! bounded detection log and the metrics snapshot. Every collaborator
//! (presentation layer, feed simulator, session store, audio cue) goes
//! through this container; nothing shares a mutable reference.
//!
//! Runs are timer-driven: `trigger` schedules the staged transitions on
//! the tokio runtime and returns immediately. A monotonically increasing
//! run generation is captured by every scheduled transition; once
//! `reset` or a later `trigger` advances the generation, stale
//! transitions become no-ops instead of mutating a superseded run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::logic::audio::{AudioCue, LogCue};
use crate::logic::detection::{DetectionEvent, DetectionLog};
use crate::logic::metrics::PerformanceMetrics;
use crate::logic::notify::{EngineNotice, Notifier};
use crate::logic::pipeline::{fresh_stages, AnalysisStage, StageId, StageStatus};
use crate::logic::report::{self, ReportError};
use crate::logic::session::SessionStore;
use crate::logic::simulator::FeedSimulator;
use crate::logic::threat::ThreatType;

// ============================================================================
// STATE
// ============================================================================

/// Mutable demo state, always behind the engine's lock.
struct DemoState {
    current_threat: Option<ThreatType>,
    is_analyzing: bool,
    stages: Vec<AnalysisStage>,
    log: DetectionLog,
    metrics: PerformanceMetrics,
}

impl DemoState {
    fn new() -> Self {
        Self {
            current_threat: None,
            is_analyzing: false,
            stages: fresh_stages(),
            log: DetectionLog::new(),
            metrics: PerformanceMetrics::default(),
        }
    }
}

pub(crate) struct EngineInner {
    state: Mutex<DemoState>,
    /// Current run generation. Scheduled transitions carry the
    /// generation they were issued under and skip themselves once it
    /// has advanced.
    generation: AtomicU64,
    audio: Box<dyn AudioCue>,
    session: Mutex<SessionStore>,
    notifier: Notifier,
    feed: FeedSimulator,
}

impl EngineInner {
    /// Apply one scheduled stage transition. Returns false when the
    /// transition belongs to a superseded run.
    fn set_stage(&self, generation: u64, id: StageId, status: StageStatus) -> bool {
        {
            let mut state = self.state.lock();
            if self.generation.load(Ordering::SeqCst) != generation {
                log::debug!("Stale transition dropped: {} -> {:?}", id.as_str(), status);
                return false;
            }
            if let Some(stage) = state.stages.iter_mut().find(|s| s.id == id) {
                stage.status = status;
            }
        }
        self.notifier.emit(EngineNotice::StageUpdated { stage: id, status });
        true
    }

    /// Finalize a completed run: synthesize the detection record, feed
    /// log + metrics + session, fire the audio cue, go idle.
    fn finish_run(&self, generation: u64, threat: ThreatType, latency_ms: u64) {
        let event;
        {
            let mut state = self.state.lock();
            if self.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            event = DetectionEvent::from_analysis(threat);
            state.log.push(event.clone());
            state.metrics.record(&event, Some(latency_ms));
            state.is_analyzing = false;
        }

        self.session.lock().save_event(&event);
        self.audio.play(threat.cue_severity());
        self.notifier.emit(EngineNotice::DetectionAdded { id: event.id });
        self.notifier.emit(EngineNotice::RunFinished { threat, latency_ms });
        log::info!(
            "Analysis complete: {} -> {} ({} ms)",
            threat,
            event.verdict,
            latency_ms
        );
    }

    /// Ingest one feed record: shared log + metrics (no latency), then
    /// the session history.
    pub(crate) fn ingest_feed(&self, event: DetectionEvent) {
        {
            let mut state = self.state.lock();
            state.log.push(event.clone());
            state.metrics.record(&event, None);
        }
        self.session.lock().save_event(&event);
        self.notifier.emit(EngineNotice::DetectionAdded { id: event.id });
    }

    pub(crate) fn feed(&self) -> &FeedSimulator {
        &self.feed
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Handle to the demo engine. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct DemoEngine {
    inner: Arc<EngineInner>,
}

impl Default for DemoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoEngine {
    /// Engine with the default collaborators: logging audio cue and the
    /// session store at its default on-disk location.
    pub fn new() -> Self {
        Self::with_collaborators(Box::new(LogCue), SessionStore::open_default())
    }

    /// Engine with explicit collaborators (tests, headless runs).
    pub fn with_collaborators(audio: Box<dyn AudioCue>, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(DemoState::new()),
                generation: AtomicU64::new(0),
                audio,
                session: Mutex::new(session),
                notifier: Notifier::default(),
                feed: FeedSimulator::new(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Scenario runner
    // ------------------------------------------------------------------

    /// Start one analysis run. Returns false (and does nothing) while a
    /// run is already in flight.
    ///
    /// Must be called from within a tokio runtime; the staged
    /// transitions are spawned as a delayed task.
    pub fn trigger(&self, threat: ThreatType) -> bool {
        let generation;
        {
            let mut state = self.inner.state.lock();
            if state.is_analyzing {
                log::debug!("Trigger ignored: analysis already active");
                return false;
            }
            state.current_threat = Some(threat);
            state.is_analyzing = true;
            state.stages = fresh_stages();
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        }

        self.inner.notifier.emit(EngineNotice::RunStarted { threat });
        log::info!("Analysis run started: {}", threat);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let started = Instant::now();
            for id in StageId::ALL {
                if !inner.set_stage(generation, id, StageStatus::Processing) {
                    return;
                }
                tokio::time::sleep(id.duration()).await;
                if !inner.set_stage(generation, id, StageStatus::Complete) {
                    return;
                }
            }
            let latency_ms = started.elapsed().as_millis() as u64;
            inner.finish_run(generation, threat, latency_ms);
        });

        true
    }

    /// Return to idle immediately: stages back to pending, no current
    /// threat. Advances the run generation so any still-scheduled
    /// transitions of the superseded run are dropped when they fire.
    /// The detection log and metrics are untouched.
    pub fn reset(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.inner.state.lock();
        state.current_threat = None;
        state.is_analyzing = false;
        state.stages = fresh_stages();
        drop(state);
        log::debug!("Demo reset to idle");
    }

    // ------------------------------------------------------------------
    // Live feed
    // ------------------------------------------------------------------

    /// Connect the simulated live feed. Idempotent.
    pub fn connect_feed(&self) {
        if self.inner.feed.start(&self.inner) {
            self.inner.notifier.emit(EngineNotice::FeedConnected);
        }
    }

    /// Disconnect the feed, cancelling the pending emission. Idempotent;
    /// already-fired ticks stay in the log.
    pub fn disconnect_feed(&self) {
        if self.inner.feed.stop() {
            self.inner.notifier.emit(EngineNotice::FeedDisconnected);
        }
    }

    pub fn is_feed_connected(&self) -> bool {
        self.inner.feed.is_connected()
    }

    // ------------------------------------------------------------------
    // Presentation accessors
    // ------------------------------------------------------------------

    pub fn is_analyzing(&self) -> bool {
        self.inner.state.lock().is_analyzing
    }

    pub fn current_threat(&self) -> Option<ThreatType> {
        self.inner.state.lock().current_threat
    }

    /// Current stage list, in execution order.
    pub fn stages(&self) -> Vec<AnalysisStage> {
        self.inner.state.lock().stages.clone()
    }

    /// Detection log snapshot, newest first.
    pub fn events(&self) -> Vec<DetectionEvent> {
        self.inner.state.lock().log.snapshot()
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.inner.state.lock().metrics.clone()
    }

    /// Subscribe to state-change notices.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EngineNotice> {
        self.inner.notifier.subscribe()
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    pub fn export_csv(&self) -> String {
        let state = self.inner.state.lock();
        report::to_csv(&state.log.snapshot())
    }

    pub fn export_json(&self) -> Result<String, ReportError> {
        let state = self.inner.state.lock();
        report::to_json(&state.log.snapshot(), &state.metrics)
    }

    // ------------------------------------------------------------------
    // Session passthrough
    // ------------------------------------------------------------------

    pub fn signup(&self, username: &str, password: &str) -> bool {
        self.inner.session.lock().signup(username, password)
    }

    pub fn login(&self, username: &str, password: &str) -> bool {
        self.inner.session.lock().login(username, password)
    }

    pub fn logout(&self) {
        self.inner.session.lock().logout()
    }

    /// Logged-in user's detection history, newest first.
    pub fn history(&self) -> Vec<DetectionEvent> {
        self.inner.session.lock().history()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::audio::SilentCue;
    use crate::logic::threat::{CueSeverity, Verdict};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct CountingCue(Arc<AtomicUsize>);

    impl AudioCue for CountingCue {
        fn play(&self, _severity: CueSeverity) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn test_engine() -> DemoEngine {
        DemoEngine::with_collaborators(Box::new(SilentCue), SessionStore::in_memory())
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_walks_all_stages_and_records_once() {
        let engine = test_engine();

        assert!(engine.trigger(ThreatType::Malware));
        assert!(engine.is_analyzing());
        assert_eq!(engine.current_threat(), Some(ThreatType::Malware));

        // Mid-run: capture done, extraction underway.
        tokio::time::sleep(Duration::from_millis(900)).await;
        let stages = engine.stages();
        assert_eq!(stages[0].status, StageStatus::Complete);
        assert_eq!(stages[1].status, StageStatus::Processing);

        tokio::time::sleep(Duration::from_millis(3200)).await;
        assert!(!engine.is_analyzing());
        assert!(engine.stages().iter().all(|s| s.status == StageStatus::Complete));

        let events = engine.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].threat, ThreatType::Malware);
        assert_eq!(events[0].verdict, Verdict::Blocked);

        let metrics = engine.metrics();
        assert_eq!(metrics.total_detections, 1);
        assert_eq!(metrics.threats_blocked, 1);
        // Paused clock: elapsed time is exactly the nominal total.
        assert!((metrics.detection_latency - 4000.0).abs() < 50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_while_active_is_rejected() {
        let engine = test_engine();

        assert!(engine.trigger(ThreatType::Malware));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!engine.trigger(ThreatType::Phishing));

        tokio::time::sleep(Duration::from_millis(4100)).await;
        let events = engine.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].threat, ThreatType::Malware);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_suppresses_stale_transitions() {
        let engine = test_engine();

        engine.trigger(ThreatType::Ddos);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        engine.reset();

        assert!(!engine.is_analyzing());
        assert_eq!(engine.current_threat(), None);
        assert!(engine.stages().iter().all(|s| s.status == StageStatus::Pending));

        // The superseded run's remaining transitions fire but no-op.
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(engine.events().is_empty());
        assert_eq!(engine.metrics().total_detections, 0);
        assert!(engine.stages().iter().all(|s| s.status == StageStatus::Pending));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retrigger_after_reset_runs_clean() {
        let engine = test_engine();

        engine.trigger(ThreatType::Malware);
        tokio::time::sleep(Duration::from_millis(500)).await;
        engine.reset();

        assert!(engine.trigger(ThreatType::Phishing));
        tokio::time::sleep(Duration::from_millis(4100)).await;

        let events = engine.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].threat, ThreatType::Phishing);
        assert_eq!(events[0].verdict, Verdict::Flagged);
        // Flagged phishing counts as a miss in the accuracy formula.
        assert!((engine.metrics().accuracy - 0.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_audio_cue_fires_once_per_completed_run() {
        let count = Arc::new(AtomicUsize::new(0));
        let engine = DemoEngine::with_collaborators(
            Box::new(CountingCue(Arc::clone(&count))),
            SessionStore::in_memory(),
        );

        engine.trigger(ThreatType::Safe);
        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Feed records never cue.
        engine.connect_feed();
        tokio::time::sleep(Duration::from_millis(30_000)).await;
        engine.disconnect_feed();
        assert!(!engine.events().is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_connect_disconnect_idempotent() {
        let engine = test_engine();

        engine.connect_feed();
        engine.connect_feed();
        assert!(engine.is_feed_connected());

        // The inter-arrival window tops out at 10 s.
        tokio::time::sleep(Duration::from_millis(10_001)).await;
        let seen = engine.events().len();
        assert!(seen >= 1);
        assert_eq!(engine.metrics().total_detections as usize, seen);
        // Feed records carry no latency.
        assert_eq!(engine.metrics().detection_latency, 0.0);

        engine.disconnect_feed();
        engine.disconnect_feed();
        assert!(!engine.is_feed_connected());

        tokio::time::sleep(Duration::from_millis(60_000)).await;
        assert_eq!(engine.events().len(), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_receives_finalized_records() {
        let engine = test_engine();
        assert!(engine.signup("alice", "pw"));

        engine.trigger(ThreatType::Malware);
        tokio::time::sleep(Duration::from_millis(4100)).await;

        let history = engine.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].threat, ThreatType::Malware);

        engine.logout();
        engine.trigger(ThreatType::Safe);
        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert!(engine.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notices_track_run_lifecycle() {
        let engine = test_engine();
        let mut rx = engine.subscribe();

        engine.trigger(ThreatType::Malware);
        tokio::time::sleep(Duration::from_millis(4100)).await;

        let mut saw_started = false;
        let mut stage_updates = 0;
        let mut saw_finished = false;
        while let Ok(notice) = rx.try_recv() {
            match notice {
                EngineNotice::RunStarted { threat } => {
                    assert_eq!(threat, ThreatType::Malware);
                    saw_started = true;
                }
                EngineNotice::StageUpdated { .. } => stage_updates += 1,
                EngineNotice::RunFinished { latency_ms, .. } => {
                    assert!(latency_ms >= 4000);
                    saw_finished = true;
                }
                EngineNotice::DetectionAdded { .. } => {}
                _ => {}
            }
        }
        assert!(saw_started);
        assert!(saw_finished);
        // Five stages, two transitions each.
        assert_eq!(stage_updates, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_passthrough() {
        let engine = test_engine();
        engine.trigger(ThreatType::Malware);
        tokio::time::sleep(Duration::from_millis(4100)).await;

        let csv = engine.export_csv();
        assert_eq!(csv.lines().count(), 2);

        let json: serde_json::Value =
            serde_json::from_str(&engine.export_json().unwrap()).unwrap();
        assert_eq!(json["events"].as_array().unwrap().len(), 1);
        assert_eq!(json["metrics"]["totalDetections"], 1);
    }
}
