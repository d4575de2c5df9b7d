//! Tasks flowing through the collector's serialized queue.

use serde::Serialize;

use super::cells::{CellReading, NetworkOverride};

/// What caused a sample to be taken. Written into each log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trigger {
    /// Periodic poll timer.
    ActivePoll,
    ServiceState,
    SignalStrength,
    DisplayInfo,
}

/// One unit of work for the single collector worker. Producers (timer, event
/// callbacks, refresh continuations) only ever enqueue; the worker processes
/// strictly in order, one at a time.
#[derive(Debug)]
pub enum Task {
    /// Transition Idle -> Active: start the poll timer, accept triggers.
    Start,
    /// Transition Active -> Idle: cancel the timer. Idempotent; tasks already
    /// enqueued still drain.
    Stop,
    /// Take one sample now.
    Collect(Trigger),
    /// Display info changed: cache the network override, then sample.
    DisplayInfo(NetworkOverride),
    /// Completion of an asynchronous cell refresh, re-entering the queue so
    /// the worker never blocks waiting on the modem.
    Process {
        trigger: Trigger,
        cells: Vec<CellReading>,
    },
    /// Tear down the worker loop entirely.
    Shutdown,
}
