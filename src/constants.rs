//! Central Configuration Constants
//!
//! Single source of truth for the simulation core's caps and timing
//! windows. To change the feed cadence, only edit this file (or set the
//! corresponding environment variable).

/// Most recent detection records kept in the shared log.
pub const DETECTION_LOG_CAP: usize = 50;

/// Most recent records kept per user in the session store.
pub const SESSION_HISTORY_CAP: usize = 50;

/// Default lower bound of the feed inter-arrival window (ms).
pub const DEFAULT_FEED_MIN_DELAY_MS: u64 = 5_000;

/// Default upper bound of the feed inter-arrival window (ms).
pub const DEFAULT_FEED_MAX_DELAY_MS: u64 = 10_000;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "AI Demo Core";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get the feed inter-arrival window from environment or use defaults.
/// Returns (min_ms, max_ms); a window read as inverted falls back to
/// the defaults.
pub fn feed_delay_window() -> (u64, u64) {
    let min = std::env::var("DEMO_FEED_MIN_DELAY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FEED_MIN_DELAY_MS);
    let max = std::env::var("DEMO_FEED_MAX_DELAY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FEED_MAX_DELAY_MS);

    if min >= max {
        (DEFAULT_FEED_MIN_DELAY_MS, DEFAULT_FEED_MAX_DELAY_MS)
    } else {
        (min, max)
    }
}
