//! Per-cell measurement model and the modem-facing source trait.
//!
//! Radio technologies carry different field sets, so a reading is a tagged
//! variant rather than a type hierarchy. All integer fields are already
//! sentinel-filtered (`Option<i32>`); raw platform integers must go through
//! [`crate::collector::sentinel::clean`] when a reading is constructed.

use tokio::sync::oneshot;

/// One observed cell at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct CellReading {
    pub registered: bool,
    pub signal: CellSignal,
}

/// Technology-specific signal fields.
#[derive(Debug, Clone, PartialEq)]
pub enum CellSignal {
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
    Other,
}

/// Raw data network type as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataNetworkType {
    Nr,
    Lte,
    Other,
}

impl DataNetworkType {
    pub fn label(self) -> &'static str {
        match self {
            DataNetworkType::Nr => "NR",
            DataNetworkType::Lte => "LTE",
            DataNetworkType::Other => "OTHER",
        }
    }
}

/// Display-info override reported alongside the raw network type. On NSA
/// deployments the raw type stays LTE while the override announces the NR
/// carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkOverride {
    #[default]
    None,
    NrNsa,
    NrAdvanced,
}

/// Fold the raw type and the display-info override into the refined label
/// written to every log record.
pub fn refine_network_type(raw: DataNetworkType, ovr: NetworkOverride) -> &'static str {
    match (raw, ovr) {
        (DataNetworkType::Lte, NetworkOverride::NrNsa) => "5G_NSA",
        (DataNetworkType::Lte, NetworkOverride::NrAdvanced) => "5G_MMWAVE",
        (DataNetworkType::Nr, _) => "5G_SA",
        _ => "OTHER",
    }
}

/// Result of asking the modem for a fresh cell scan.
pub enum Refresh {
    /// Refresh is in flight; the receiver resolves with the fresh set. If the
    /// sender is dropped (refresh failed), the caller falls back to
    /// [`CellSource::cached`].
    Fresh(oneshot::Receiver<Vec<CellReading>>),
    /// Refresh is unsupported on this host; the cached set is all there is.
    Cached(Vec<CellReading>),
}

/// Supplier of per-cell measurements.
pub trait CellSource: Send {
    /// Kick off a fresh read of visible-cell info.
    fn request_refresh(&mut self) -> Refresh;

    /// Last measurement set delivered by the platform.
    fn cached(&self) -> Vec<CellReading>;

    /// Current raw data network type.
    fn network_type(&self) -> DataNetworkType;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refined_type_table() {
        assert_eq!(
            refine_network_type(DataNetworkType::Lte, NetworkOverride::NrNsa),
            "5G_NSA"
        );
        assert_eq!(
            refine_network_type(DataNetworkType::Lte, NetworkOverride::NrAdvanced),
            "5G_MMWAVE"
        );
        assert_eq!(
            refine_network_type(DataNetworkType::Nr, NetworkOverride::None),
            "5G_SA"
        );
        assert_eq!(
            refine_network_type(DataNetworkType::Nr, NetworkOverride::NrNsa),
            "5G_SA"
        );
        assert_eq!(
            refine_network_type(DataNetworkType::Lte, NetworkOverride::None),
            "OTHER"
        );
        assert_eq!(
            refine_network_type(DataNetworkType::Other, NetworkOverride::NrNsa),
            "OTHER"
        );
    }
}
