//! Feature extraction: anchor-cell selection and min-max normalization.

use super::cells::{CellReading, CellSignal};

pub const FEATURE_COUNT: usize = 3;

// Physical ranges the model was trained against. Fixed configuration, not
// learned; values outside saturate rather than extrapolate.
pub const RSRP_MIN: f32 = -140.0;
pub const RSRP_MAX: f32 = -40.0;
pub const RSRQ_MIN: f32 = -30.0;
pub const RSRQ_MAX: f32 = -3.0;
pub const SINR_MIN: f32 = -10.0;
pub const SINR_MAX: f32 = 30.0;

// Raw defaults substituted when a secondary field is absent on an otherwise
// usable anchor. RSRP has no default: a missing RSRP disqualifies the cell.
const DEFAULT_RSRQ: f32 = -20.0;
const DEFAULT_NR_SINR: f32 = -10.0;
const DEFAULT_LTE_RSSNR: f32 = 0.0;

/// Linear min-max scaling clamped to [0, 1].
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// One normalized sample: `[rsrp, rsrq, sinr]`, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub rsrp: f32,
    pub rsrq: f32,
    pub sinr: f32,
}

impl FeatureVector {
    /// Build from raw dB/dBm values, normalizing each feature to its range.
    pub fn from_raw(rsrp: f32, rsrq: f32, sinr: f32) -> Self {
        Self {
            rsrp: normalize(rsrp, RSRP_MIN, RSRP_MAX),
            rsrq: normalize(rsrq, RSRQ_MIN, RSRQ_MAX),
            sinr: normalize(sinr, SINR_MIN, SINR_MAX),
        }
    }

    pub fn as_array(&self) -> [f32; FEATURE_COUNT] {
        [self.rsrp, self.rsrq, self.sinr]
    }
}

/// Select the anchor cell for this tick and fold it into a feature vector.
///
/// NR is preferred, LTE is the fallback; either must be registered and carry
/// a present RSRP. Returns the index of the chosen cell so the score can be
/// attached to its log entry, or `None` when no cell qualifies (the tick
/// still logs, it just skips windowing).
pub fn anchor_features(cells: &[CellReading]) -> Option<(usize, FeatureVector)> {
    let nr = cells.iter().enumerate().find_map(|(i, cell)| {
        if !cell.registered {
            return None;
        }
        match cell.signal {
            CellSignal::Nr {
                rsrp: Some(rsrp),
                rsrq,
                sinr,
                ..
            } => Some((
                i,
                FeatureVector::from_raw(
                    rsrp as f32,
                    rsrq.map_or(DEFAULT_RSRQ, |v| v as f32),
                    sinr.map_or(DEFAULT_NR_SINR, |v| v as f32),
                ),
            )),
            _ => None,
        }
    });
    if nr.is_some() {
        return nr;
    }

    cells.iter().enumerate().find_map(|(i, cell)| {
        if !cell.registered {
            return None;
        }
        match cell.signal {
            CellSignal::Lte {
                rsrp: Some(rsrp),
                rsrq,
                rssnr,
                ..
            } => Some((
                i,
                FeatureVector::from_raw(
                    rsrp as f32,
                    rsrq.map_or(DEFAULT_RSRQ, |v| v as f32),
                    rssnr.map_or(DEFAULT_LTE_RSSNR, |v| v as f32),
                ),
            )),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nr_cell(registered: bool, rsrp: Option<i32>) -> CellReading {
        CellReading {
            registered,
            signal: CellSignal::Nr {
                pci: Some(101),
                nci: Some(123_456),
                rsrp,
                rsrq: Some(-11),
                sinr: Some(15),
            },
        }
    }

    fn lte_cell(registered: bool, rsrp: Option<i32>) -> CellReading {
        CellReading {
            registered,
            signal: CellSignal::Lte {
                pci: Some(77),
                earfcn: Some(1300),
                rsrp,
                rsrq: Some(-9),
                rssnr: Some(10),
                cqi: Some(12),
                timing_advance: Some(3),
            },
        }
    }

    #[test]
    fn normalize_endpoints_and_bounds() {
        assert_eq!(normalize(RSRP_MIN, RSRP_MIN, RSRP_MAX), 0.0);
        assert_eq!(normalize(RSRP_MAX, RSRP_MIN, RSRP_MAX), 1.0);
        for v in [-500.0, -140.0, -90.0, -40.0, 100.0] {
            let n = normalize(v, RSRP_MIN, RSRP_MAX);
            assert!((0.0..=1.0).contains(&n), "out of bounds for {v}: {n}");
        }
    }

    #[test]
    fn normalize_equals_normalize_of_clamped() {
        for v in [-1000.0f32, -140.0, -77.5, -40.0, 0.0] {
            let clamped = v.clamp(RSRP_MIN, RSRP_MAX);
            assert_eq!(
                normalize(v, RSRP_MIN, RSRP_MAX),
                normalize(clamped, RSRP_MIN, RSRP_MAX)
            );
        }
    }

    #[test]
    fn nr_preferred_over_lte() {
        let cells = vec![lte_cell(true, Some(-95)), nr_cell(true, Some(-90))];
        let (idx, _) = anchor_features(&cells).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn lte_fallback_when_nr_unusable() {
        // NR present but missing RSRP (sentinel already filtered upstream).
        let cells = vec![nr_cell(true, None), lte_cell(true, Some(-95))];
        let (idx, v) = anchor_features(&cells).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(v.rsrp, normalize(-95.0, RSRP_MIN, RSRP_MAX));
    }

    #[test]
    fn unregistered_cells_never_anchor() {
        let cells = vec![nr_cell(false, Some(-80)), lte_cell(false, Some(-85))];
        assert!(anchor_features(&cells).is_none());
    }

    #[test]
    fn absent_secondary_fields_use_defaults() {
        let cells = vec![CellReading {
            registered: true,
            signal: CellSignal::Nr {
                pci: None,
                nci: None,
                rsrp: Some(-90),
                rsrq: None,
                sinr: None,
            },
        }];
        let (_, v) = anchor_features(&cells).unwrap();
        assert_eq!(v.rsrq, normalize(DEFAULT_RSRQ, RSRQ_MIN, RSRQ_MAX));
        assert_eq!(v.sinr, normalize(DEFAULT_NR_SINR, SINR_MIN, SINR_MAX));
    }

    #[test]
    fn empty_set_yields_no_anchor() {
        assert!(anchor_features(&[]).is_none());
    }
}
