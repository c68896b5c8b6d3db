//! Audio Cue Collaborator
//!
//! Fire-and-forget notification seam keyed by cue severity. The actual
//! synthesis lives in the presentation layer; the core only tells it
//! which cue to play, once per completed run. A cue that fails to play
//! is silently ignored.

use crate::logic::threat::CueSeverity;

/// Sink for the per-run completion cue.
pub trait AudioCue: Send + Sync {
    fn play(&self, severity: CueSeverity);
}

/// Default cue sink: logs the cue at debug level.
pub struct LogCue;

impl AudioCue for LogCue {
    fn play(&self, severity: CueSeverity) {
        log::debug!("Audio cue: {:?}", severity);
    }
}

/// No-op cue sink for tests and headless runs.
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self, _severity: CueSeverity) {}
}
