//! Ancillary telemetry collaborators: battery, position, traffic counters
//! and the ambient light scalar.
//!
//! Each source is individually optional; a missing one degrades the record,
//! never the tick. The light level is the one value written from outside the
//! worker: the sensor stream stores the latest reading into an atomic cell
//! and the worker reads it without further synchronization (last-write-wins,
//! staleness by one tick is harmless).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Last known position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_mps: f64,
}

/// Raw cumulative mobile traffic counters. Negative means the platform does
/// not support the statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficCounters {
    pub rx_bytes: i64,
    pub tx_bytes: i64,
}

pub trait BatterySource: Send {
    fn level_percent(&self) -> Option<u8>;
}

pub trait PositionSource: Send {
    fn last_fix(&self) -> Option<PositionFix>;
}

pub trait TrafficSource: Send {
    fn mobile_counters(&self) -> TrafficCounters;
}

/// Shared last-observed ambient light level in lux.
///
/// Stored as f32 bits in an atomic; negative means never observed.
#[derive(Debug, Clone)]
pub struct LightLevel {
    bits: Arc<AtomicU32>,
}

impl LightLevel {
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU32::new((-1.0_f32).to_bits())),
        }
    }

    /// Called from the sensor callback context.
    pub fn set(&self, lux: f32) {
        self.bits.store(lux.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> Option<f32> {
        let lux = f32::from_bits(self.bits.load(Ordering::Relaxed));
        if lux >= 0.0 {
            Some(lux)
        } else {
            None
        }
    }
}

impl Default for LightLevel {
    fn default() -> Self {
        Self::new()
    }
}

/// Bundle of ancillary sources handed to the collector.
pub struct TelemetrySources {
    pub battery: Option<Box<dyn BatterySource>>,
    pub position: Option<Box<dyn PositionSource>>,
    pub traffic: Option<Box<dyn TrafficSource>>,
    pub light: LightLevel,
}

impl TelemetrySources {
    /// No sources at all; every optional record field comes out absent.
    pub fn none() -> Self {
        Self {
            battery: None,
            position: None,
            traffic: None,
            light: LightLevel::new(),
        }
    }
}
