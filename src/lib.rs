pub mod collector;
pub mod logfile;
pub mod model;
pub mod record;
pub mod sim;

// Re-export specific items if needed for convenient access
pub use collector::{Collector, CollectorConfig, CollectorHandle};
