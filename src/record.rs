//! Durable log record types: one self-contained JSON object per processed
//! sample. Field names match the ML-ready capture format consumed downstream.

use serde::Serialize;

use crate::collector::cells::{CellReading, CellSignal};
use crate::collector::event::Trigger;
use crate::collector::scorer::AnomalyResult;

/// The unit of durable output. Immutable once written, append-only.
#[derive(Debug, Serialize)]
pub struct LogRecord {
    pub timestamp_epoch: i64,
    pub timestamp_human: String,
    pub trigger: Trigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
    pub network_type_raw: &'static str,
    pub network_type_refined: &'static str,
    pub is_5g_nsa: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_lux: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_lng: Option<f64>,
    pub traffic_rx_bytes: u64,
    pub traffic_tx_bytes: u64,
    pub cells: Vec<CellRecord>,
}

/// One per-cell observation inside a record. Sentinel-filtered signal fields
/// serialize as `null` when absent; scoring fields appear only on the anchor
/// cell.
#[derive(Debug, Serialize)]
pub struct CellRecord {
    #[serde(rename = "type")]
    pub technology: &'static str,
    pub is_registered: bool,
    pub timestamp: i64,
    #[serde(flatten)]
    pub signal: SignalFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_anomaly_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_status: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SignalFields {
    Nr {
        pci: Option<i32>,
        nci: Option<i64>,
        rsrp: Option<i32>,
        rsrq: Option<i32>,
        sinr: Option<i32>,
    },
    Lte {
        pci: Option<i32>,
        earfcn: Option<i32>,
        rsrp: Option<i32>,
        rsrq: Option<i32>,
        rssnr: Option<i32>,
        cqi: Option<i32>,
        timing_advance: Option<i32>,
    },
    Gsm {
        rssi: Option<i32>,
    },
    Wcdma {
        rscp: Option<i32>,
    },
    Other {},
}

impl CellRecord {
    pub fn from_reading(reading: &CellReading, now_ms: i64) -> Self {
        let (technology, signal) = match reading.signal {
            CellSignal::Nr {
                pci,
                nci,
                rsrp,
                rsrq,
                sinr,
            } => (
                "5G_NR",
                SignalFields::Nr {
                    pci,
                    nci,
                    rsrp,
                    rsrq,
                    sinr,
                },
            ),
            CellSignal::Lte {
                pci,
                earfcn,
                rsrp,
                rsrq,
                rssnr,
                cqi,
                timing_advance,
            } => (
                "LTE",
                SignalFields::Lte {
                    pci,
                    earfcn,
                    rsrp,
                    rsrq,
                    rssnr,
                    cqi,
                    timing_advance,
                },
            ),
            CellSignal::Gsm { rssi } => ("GSM", SignalFields::Gsm { rssi }),
            CellSignal::Wcdma { rscp } => ("WCDMA", SignalFields::Wcdma { rscp }),
            CellSignal::Other => ("OTHER", SignalFields::Other {}),
        };
        Self {
            technology,
            is_registered: reading.registered,
            timestamp: now_ms,
            signal,
            ai_anomaly_score: None,
            ai_status: None,
        }
    }

    /// Attach the window evaluation outcome to this (anchor) cell.
    pub fn attach_score(&mut self, result: &AnomalyResult) {
        self.ai_anomaly_score = result.score();
        self.ai_status = Some(result.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::cells::CellReading;

    fn nr_reading() -> CellReading {
        CellReading {
            registered: true,
            signal: CellSignal::Nr {
                pci: Some(42),
                nci: Some(9_000_000),
                rsrp: Some(-92),
                rsrq: None,
                sinr: Some(14),
            },
        }
    }

    #[test]
    fn absent_signal_fields_serialize_as_null() {
        let cell = CellRecord::from_reading(&nr_reading(), 1_700_000_000_000);
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["type"], "5G_NR");
        assert_eq!(json["rsrp"], -92);
        assert!(json["rsrq"].is_null());
        // no score attached -> keys omitted entirely
        assert!(json.get("ai_status").is_none());
        assert!(json.get("ai_anomaly_score").is_none());
    }

    #[test]
    fn attached_score_appears_on_record() {
        let mut cell = CellRecord::from_reading(&nr_reading(), 0);
        cell.attach_score(&AnomalyResult::Anomaly(0.31));
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["ai_status"], "ANOMALY");
        let score = json["ai_anomaly_score"].as_f64().unwrap();
        assert!((score - 0.31).abs() < 1e-6);
    }

    #[test]
    fn buffering_has_status_but_no_score() {
        let mut cell = CellRecord::from_reading(&nr_reading(), 0);
        cell.attach_score(&AnomalyResult::Buffering);
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["ai_status"], "BUFFERING");
        assert!(json.get("ai_anomaly_score").is_none());
    }

    #[test]
    fn record_serializes_one_line() {
        let record = LogRecord {
            timestamp_epoch: 1_700_000_000_000,
            timestamp_human: "12:34:56.789".to_string(),
            trigger: Trigger::ActivePoll,
            battery_level: Some(84),
            network_type_raw: "LTE",
            network_type_refined: "5G_NSA",
            is_5g_nsa: true,
            light_lux: None,
            speed_kmh: Some(12.6),
            gps_lat: Some(52.23),
            gps_lng: Some(21.01),
            traffic_rx_bytes: 1024,
            traffic_tx_bytes: 256,
            cells: vec![CellRecord::from_reading(&nr_reading(), 1_700_000_000_000)],
        };
        let line = serde_json::to_string(&record).unwrap();
        assert!(!line.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["trigger"], "ActivePoll");
        assert_eq!(json["is_5g_nsa"], true);
        // light never observed -> key omitted
        assert!(json.get("light_lux").is_none());
        assert_eq!(json["cells"].as_array().unwrap().len(), 1);
    }
}
