//! AI Demo Core - Headless Demo Runner
//!
//! Drives one full analysis run with the live feed connected and prints
//! the resulting metrics and reports. The whole core is cooperative and
//! timer-driven, so a current-thread runtime is enough.

use ai_demo_core::logic::pipeline;
use ai_demo_core::{constants, DemoEngine, EngineNotice, ThreatType};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    rt.block_on(run());
}

async fn run() {
    let engine = DemoEngine::new();
    let mut notices = engine.subscribe();

    engine.connect_feed();
    engine.trigger(ThreatType::Malware);

    // Follow the run to completion, then let the feed tick a few times.
    let run_budget = pipeline::total_duration() + std::time::Duration::from_secs(12);
    let follow = async {
        while let Ok(notice) = notices.recv().await {
            match notice {
                EngineNotice::StageUpdated { stage, status } => {
                    log::info!("  [{}] {:?}", stage.as_str(), status);
                }
                EngineNotice::RunFinished { threat, latency_ms } => {
                    log::info!("Run finished: {} in {} ms", threat, latency_ms);
                }
                EngineNotice::DetectionAdded { id } => {
                    log::info!("Detection recorded: {}", id);
                }
                _ => {}
            }
        }
    };
    let _ = tokio::time::timeout(run_budget, follow).await;

    engine.disconnect_feed();

    let metrics = engine.metrics();
    log::info!(
        "Session metrics: {} detections, {} blocked, accuracy {:.1}%, avg latency {:.0} ms",
        metrics.total_detections,
        metrics.threats_blocked,
        metrics.accuracy,
        metrics.detection_latency
    );

    println!("--- CSV report ---");
    println!("{}", engine.export_csv());

    match engine.export_json() {
        Ok(json) => {
            println!("--- JSON report ---");
            println!("{}", json);
        }
        Err(e) => log::error!("JSON export failed: {}", e),
    }
}
