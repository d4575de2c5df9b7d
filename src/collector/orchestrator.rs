//! The sample orchestrator: a single worker draining a serialized task
//! queue fed by the poll timer, event triggers and refresh continuations.
//!
//! The worker is the only writer of the window, the traffic tracker and the
//! log handle, so none of them need locking. Producers only enqueue.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cells::{refine_network_type, CellReading, CellSource, NetworkOverride, Refresh};
use super::event::{Task, Trigger};
use super::features::anchor_features;
use super::scorer::{AnomalyResult, ScoreEngine};
use super::telemetry::TelemetrySources;
use super::traffic::TrafficDeltaTracker;
use super::window::SlidingWindow;
use crate::logfile::SessionLog;
use crate::model::ReconstructionModel;
use crate::record::{CellRecord, LogRecord};

/// Sampling cadence of the active poll timer.
pub const POLL_INTERVAL_MS: u64 = 1000;

pub struct CollectorConfig {
    pub poll_interval: Duration,
    pub log_dir: PathBuf,
    pub queue_depth: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            log_dir: PathBuf::from("logs"),
            queue_depth: 64,
        }
    }
}

/// Cloneable front door to the collector queue. Event sources call these
/// from arbitrary contexts; each call enqueues exactly one task.
#[derive(Clone)]
pub struct CollectorHandle {
    tx: mpsc::Sender<Task>,
}

impl CollectorHandle {
    pub async fn start(&self) {
        self.send(Task::Start).await;
    }

    /// Safe to call when already idle.
    pub async fn stop(&self) {
        self.send(Task::Stop).await;
    }

    pub async fn service_state_changed(&self) {
        self.send(Task::Collect(Trigger::ServiceState)).await;
    }

    pub async fn signal_strength_changed(&self) {
        self.send(Task::Collect(Trigger::SignalStrength)).await;
    }

    pub async fn display_info_changed(&self, override_type: NetworkOverride) {
        self.send(Task::DisplayInfo(override_type)).await;
    }

    /// Ends the worker loop. Tasks already queued ahead of this drain first.
    pub async fn shutdown(&self) {
        self.send(Task::Shutdown).await;
    }

    async fn send(&self, task: Task) {
        if self.tx.send(task).await.is_err() {
            warn!("collector worker gone, task dropped");
        }
    }
}

/// Owns all per-session pipeline state. Created Idle; START activates it.
pub struct Collector {
    rx: mpsc::Receiver<Task>,
    tx: mpsc::Sender<Task>,
    config: CollectorConfig,
    cells: Box<dyn CellSource>,
    telemetry: TelemetrySources,
    window: SlidingWindow,
    scorer: ScoreEngine,
    traffic: TrafficDeltaTracker,
    log: SessionLog,
    override_type: NetworkOverride,
    /// Some while Active; the token cancels the poll timer on STOP.
    poller: Option<CancellationToken>,
}

impl Collector {
    pub fn new(
        config: CollectorConfig,
        cells: Box<dyn CellSource>,
        telemetry: TelemetrySources,
        model: Option<Box<dyn ReconstructionModel>>,
    ) -> std::io::Result<(Self, CollectorHandle)> {
        let (tx, rx) = mpsc::channel(config.queue_depth);
        let session_start = Local::now().timestamp_millis();
        let log = SessionLog::create(&config.log_dir, session_start)?;
        info!(path = %log.path().display(), "session log opened");

        let collector = Self {
            rx,
            tx: tx.clone(),
            config,
            cells,
            telemetry,
            window: SlidingWindow::new(),
            scorer: ScoreEngine::new(model),
            traffic: TrafficDeltaTracker::new(),
            log,
            override_type: NetworkOverride::None,
            poller: None,
        };
        Ok((collector, CollectorHandle { tx }))
    }

    /// Drain the queue until shutdown. Strictly one task at a time.
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            if matches!(task, Task::Shutdown) {
                break;
            }
            self.handle(task).await;
        }
        if let Some(token) = self.poller.take() {
            token.cancel();
        }
        info!("collector worker stopped");
    }

    /// Process one task. Public so tests can drive ticks deterministically.
    pub async fn handle(&mut self, task: Task) {
        match task {
            Task::Start => self.start(),
            Task::Stop => self.stop(),
            Task::Collect(trigger) => self.collect(trigger).await,
            Task::DisplayInfo(override_type) => {
                self.override_type = override_type;
                self.collect(Trigger::DisplayInfo).await;
            }
            Task::Process { trigger, cells } => self.process(trigger, cells).await,
            Task::Shutdown => {}
        }
    }

    pub fn is_active(&self) -> bool {
        self.poller.is_some()
    }

    fn start(&mut self) {
        if self.poller.is_some() {
            debug!("start ignored, already active");
            return;
        }
        let token = CancellationToken::new();
        let child = token.clone();
        let tx = self.tx.clone();
        let period = self.config.poll_interval;
        tokio::spawn(async move {
            let mut cadence = interval(period);
            cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = cadence.tick() => {
                        if tx.send(Task::Collect(Trigger::ActivePoll)).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        self.poller = Some(token);
        info!(period_ms = period.as_millis() as u64, "collection started");
    }

    fn stop(&mut self) {
        match self.poller.take() {
            Some(token) => {
                token.cancel();
                info!("collection stopped, queued tasks will drain");
            }
            None => debug!("stop ignored, already idle"),
        }
    }

    /// One sampling tick. On hosts that support it the cell refresh is
    /// asynchronous and its completion re-enters the queue; otherwise the
    /// cached set is processed inline.
    async fn collect(&mut self, trigger: Trigger) {
        if self.poller.is_none() {
            debug!(?trigger, "trigger while idle, ignored");
            return;
        }
        match self.cells.request_refresh() {
            Refresh::Fresh(pending) => {
                let fallback = self.cells.cached();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let cells = match pending.await {
                        Ok(cells) => cells,
                        Err(_) => {
                            warn!("cell refresh failed, falling back to cached measurements");
                            fallback
                        }
                    };
                    let _ = tx.send(Task::Process { trigger, cells }).await;
                });
            }
            Refresh::Cached(cells) => self.process(trigger, cells).await,
        }
    }

    /// Fold one measurement set into the window, score it and emit a record.
    async fn process(&mut self, trigger: Trigger, cells: Vec<CellReading>) {
        let now = Local::now();
        let now_ms = now.timestamp_millis();

        let (delta_rx, delta_tx) = match &self.telemetry.traffic {
            Some(source) => {
                let counters = source.mobile_counters();
                self.traffic
                    .observe(counters.rx_bytes, counters.tx_bytes, now_ms)
            }
            None => (0, 0),
        };
        let fix = self.telemetry.position.as_ref().and_then(|p| p.last_fix());
        let raw_type = self.cells.network_type();

        let mut cell_records: Vec<CellRecord> = cells
            .iter()
            .map(|cell| CellRecord::from_reading(cell, now_ms))
            .collect();

        // Anchor selection drives windowing; a tick without a usable anchor
        // still logs its ancillary telemetry.
        if let Some((anchor_idx, vector)) = anchor_features(&cells) {
            self.window.push(vector);
            let result = self.scorer.evaluate(&self.window);
            if let AnomalyResult::Anomaly(score) = result {
                warn!(score, "reconstruction anomaly detected");
            }
            cell_records[anchor_idx].attach_score(&result);
        }

        let record = LogRecord {
            timestamp_epoch: now_ms,
            timestamp_human: now.format("%H:%M:%S%.3f").to_string(),
            trigger,
            battery_level: self
                .telemetry
                .battery
                .as_ref()
                .and_then(|b| b.level_percent()),
            network_type_raw: raw_type.label(),
            network_type_refined: refine_network_type(raw_type, self.override_type),
            is_5g_nsa: self.override_type == NetworkOverride::NrNsa,
            light_lux: self.telemetry.light.get(),
            speed_kmh: fix.map(|f| f.speed_mps * 3.6),
            gps_lat: fix.map(|f| f.latitude),
            gps_lng: fix.map(|f| f.longitude),
            traffic_rx_bytes: delta_rx,
            traffic_tx_bytes: delta_tx,
            cells: cell_records,
        };

        if let Err(err) = self.log.append(&record) {
            warn!(error = %err, "failed to append log record, continuing");
        }
    }

    /// Path of the session log file, for tests and status reporting.
    pub fn log_path(&self) -> &std::path::Path {
        self.log.path()
    }
}
