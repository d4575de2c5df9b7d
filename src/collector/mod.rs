//! Radio-link sampling pipeline: event/poll merge, windowing and scoring.

pub mod cells;
pub mod event;
pub mod features;
pub mod orchestrator;
pub mod scorer;
pub mod sentinel;
pub mod telemetry;
pub mod traffic;
pub mod window;

pub use orchestrator::{Collector, CollectorConfig, CollectorHandle, POLL_INTERVAL_MS};
pub use scorer::{AnomalyResult, ANOMALY_THRESHOLD};
pub use window::WINDOW_SIZE;
