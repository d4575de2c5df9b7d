//! Converts cumulative mobile traffic counters into per-tick deltas.

use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Baseline {
    rx_bytes: u64,
    tx_bytes: u64,
    at_ms: i64,
}

/// Tracks the last observed cumulative rx/tx byte counts.
///
/// Deltas are never negative: a counter decrease (radio reconnect or
/// statistics rollover) reports 0 and rebaselines. The platform "unsupported"
/// sentinel (a negative reading) is treated as 0 before differencing.
#[derive(Debug, Default)]
pub struct TrafficDeltaTracker {
    last: Option<Baseline>,
}

impl TrafficDeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current counters and return `(delta_rx, delta_tx)` since
    /// the previous observation. The first call stores the baseline and
    /// returns `(0, 0)`.
    pub fn observe(&mut self, raw_rx: i64, raw_tx: i64, now_ms: i64) -> (u64, u64) {
        let rx = raw_rx.max(0) as u64;
        let tx = raw_tx.max(0) as u64;

        let deltas = match self.last {
            Some(prev) => {
                if rx < prev.rx_bytes || tx < prev.tx_bytes {
                    debug!(
                        age_ms = now_ms - prev.at_ms,
                        "traffic counters decreased, rebaselining"
                    );
                }
                (
                    rx.checked_sub(prev.rx_bytes).unwrap_or(0),
                    tx.checked_sub(prev.tx_bytes).unwrap_or(0),
                )
            }
            None => (0, 0),
        };

        self.last = Some(Baseline {
            rx_bytes: rx,
            tx_bytes: tx,
            at_ms: now_ms,
        });
        deltas
    }
}
