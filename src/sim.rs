//! Simulated collaborators so the binary runs end-to-end without radio
//! hardware: a drifting NR/LTE cell pair and a monotonic traffic counter.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::collector::cells::{
    CellReading, CellSignal, CellSource, DataNetworkType, Refresh,
};
use crate::collector::sentinel;
use crate::collector::telemetry::{TrafficCounters, TrafficSource};

/// Deterministic pseudo-modem: signal levels drift sinusoidally around a
/// healthy baseline, with the occasional sentinel reading mixed in the way
/// real modems drop fields.
pub struct SimulatedModem {
    tick: u64,
    cached: Vec<CellReading>,
}

impl SimulatedModem {
    pub fn new() -> Self {
        let mut modem = Self {
            tick: 0,
            cached: Vec::new(),
        };
        modem.cached = modem.generate();
        modem
    }

    fn generate(&self) -> Vec<CellReading> {
        let phase = self.tick as f32 / 7.0;
        let rsrp = -95 + (6.0 * phase.sin()) as i32;
        let rsrq = -12 + (3.0 * (phase * 0.6).cos()) as i32;
        // every 13th tick the modem reports sinr as unavailable
        let sinr_raw = if self.tick % 13 == 0 {
            sentinel::UNAVAILABLE
        } else {
            12 + (5.0 * (phase * 1.3).sin()) as i32
        };

        vec![
            CellReading {
                registered: true,
                signal: CellSignal::Nr {
                    pci: Some(311),
                    nci: Some(86_213_633),
                    rsrp: sentinel::clean(rsrp),
                    rsrq: sentinel::clean(rsrq),
                    sinr: sentinel::clean(sinr_raw),
                },
            },
            CellReading {
                registered: false,
                signal: CellSignal::Lte {
                    pci: Some(148),
                    earfcn: Some(1300),
                    rsrp: sentinel::clean(rsrp - 8),
                    rsrq: sentinel::clean(rsrq - 2),
                    rssnr: sentinel::clean(8),
                    cqi: sentinel::clean(sentinel::UNAVAILABLE),
                    timing_advance: sentinel::clean(2),
                },
            },
        ]
    }
}

impl Default for SimulatedModem {
    fn default() -> Self {
        Self::new()
    }
}

impl CellSource for SimulatedModem {
    fn request_refresh(&mut self) -> Refresh {
        self.tick += 1;
        self.cached = self.generate();
        Refresh::Cached(self.cached.clone())
    }

    fn cached(&self) -> Vec<CellReading> {
        self.cached.clone()
    }

    fn network_type(&self) -> DataNetworkType {
        DataNetworkType::Nr
    }
}

/// Cumulative counters that grow a little on every read.
pub struct SimulatedTraffic {
    rx: AtomicU64,
    tx: AtomicU64,
}

impl SimulatedTraffic {
    pub fn new() -> Self {
        Self {
            rx: AtomicU64::new(0),
            tx: AtomicU64::new(0),
        }
    }
}

impl Default for SimulatedTraffic {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficSource for SimulatedTraffic {
    fn mobile_counters(&self) -> TrafficCounters {
        TrafficCounters {
            rx_bytes: self.rx.fetch_add(1500, Ordering::Relaxed) as i64,
            tx_bytes: self.tx.fetch_add(300, Ordering::Relaxed) as i64,
        }
    }
}
