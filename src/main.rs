use std::path::{Path, PathBuf};
use std::time::Duration;

use linkwatch::collector::orchestrator::POLL_INTERVAL_MS;
use linkwatch::collector::telemetry::{LightLevel, TelemetrySources};
use linkwatch::model::{DenseAutoencoder, ReconstructionModel};
use linkwatch::sim::{SimulatedModem, SimulatedTraffic};
use linkwatch::{Collector, CollectorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("linkwatch starting");

    let log_dir: PathBuf = std::env::var("LINKWATCH_LOG_DIR")
        .unwrap_or_else(|_| "logs".to_string())
        .into();
    std::fs::create_dir_all(&log_dir)?;

    // Model unavailability is not fatal; collection continues unscored.
    let model: Option<Box<dyn ReconstructionModel>> = match std::env::var("LINKWATCH_MODEL") {
        Ok(path) => match DenseAutoencoder::load(Path::new(&path)) {
            Ok(model) => {
                tracing::info!(%path, "reconstruction model loaded");
                Some(Box::new(model))
            }
            Err(err) => {
                tracing::warn!(%path, error = %err, "failed to load reconstruction model");
                None
            }
        },
        Err(_) => {
            tracing::warn!("LINKWATCH_MODEL not set, running without scoring");
            None
        }
    };

    let config = CollectorConfig {
        poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        log_dir,
        queue_depth: 64,
    };
    let telemetry = TelemetrySources {
        battery: None,
        position: None,
        traffic: Some(Box::new(SimulatedTraffic::new())),
        light: LightLevel::new(),
    };

    let (collector, handle) =
        Collector::new(config, Box::new(SimulatedModem::new()), telemetry, model)?;
    let worker = tokio::spawn(collector.run());

    handle.start().await;
    tracing::info!("collecting, press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    handle.stop().await;
    handle.shutdown().await;
    worker.await?;

    Ok(())
}
