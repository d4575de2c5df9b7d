//! Window scoring against the reconstruction model.

use tracing::warn;

use super::window::SlidingWindow;
use crate::model::{ReconstructionModel, WindowTensor};

/// Reconstruction error above which a window is flagged anomalous.
pub const ANOMALY_THRESHOLD: f32 = 0.15;

/// Outcome of evaluating one tick's window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnomalyResult {
    /// Window not yet full; no inference performed.
    Buffering,
    Normal(f32),
    Anomaly(f32),
    /// Model failed to load or inference failed; distinct from Normal so
    /// "no model" is never mistaken for "no anomaly".
    Unavailable,
}

impl AnomalyResult {
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyResult::Buffering => "BUFFERING",
            AnomalyResult::Normal(_) => "NORMAL",
            AnomalyResult::Anomaly(_) => "ANOMALY",
            AnomalyResult::Unavailable => "UNAVAILABLE",
        }
    }

    pub fn score(&self) -> Option<f32> {
        match self {
            AnomalyResult::Normal(mse) | AnomalyResult::Anomaly(mse) => Some(*mse),
            _ => None,
        }
    }
}

/// Mean squared error over all cells of a window pair.
pub fn mean_squared_error(input: &WindowTensor, output: &WindowTensor) -> f32 {
    let mut sum = 0.0_f32;
    let mut count = 0usize;
    for (a, b) in input.iter().zip(output.iter()) {
        for (x, y) in a.iter().zip(b.iter()) {
            let diff = x - y;
            sum += diff * diff;
            count += 1;
        }
    }
    sum / count as f32
}

/// Owns the (optional) model and classifies completed windows.
///
/// The model is frozen at startup; once unavailable it stays unavailable for
/// the session, so the condition is logged once rather than every tick.
pub struct ScoreEngine {
    model: Option<Box<dyn ReconstructionModel>>,
    unavailable_reported: bool,
}

impl ScoreEngine {
    pub fn new(model: Option<Box<dyn ReconstructionModel>>) -> Self {
        Self {
            model,
            unavailable_reported: false,
        }
    }

    pub fn evaluate(&mut self, window: &SlidingWindow) -> AnomalyResult {
        if !window.is_full() {
            return AnomalyResult::Buffering;
        }

        let Some(model) = self.model.as_ref() else {
            if !self.unavailable_reported {
                warn!("reconstruction model unavailable, window scoring disabled for this session");
                self.unavailable_reported = true;
            }
            return AnomalyResult::Unavailable;
        };

        let mut input: WindowTensor = [[0.0; crate::collector::features::FEATURE_COUNT];
            crate::collector::window::WINDOW_SIZE];
        for (slot, vector) in input.iter_mut().zip(window.snapshot()) {
            *slot = vector.as_array();
        }

        match model.infer(&input) {
            Ok(output) => {
                let mse = mean_squared_error(&input, &output);
                if mse > ANOMALY_THRESHOLD {
                    AnomalyResult::Anomaly(mse)
                } else {
                    AnomalyResult::Normal(mse)
                }
            }
            Err(err) => {
                if !self.unavailable_reported {
                    warn!(error = %err, "model inference failed, treating model as unavailable");
                    self.unavailable_reported = true;
                }
                AnomalyResult::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::features::FeatureVector;
    use crate::collector::window::WINDOW_SIZE;
    use crate::model::ModelError;

    struct Identity;
    impl ReconstructionModel for Identity {
        fn infer(&self, input: &WindowTensor) -> Result<WindowTensor, ModelError> {
            Ok(*input)
        }
    }

    struct Offset(f32);
    impl ReconstructionModel for Offset {
        fn infer(&self, input: &WindowTensor) -> Result<WindowTensor, ModelError> {
            let mut out = *input;
            for row in out.iter_mut() {
                for cell in row.iter_mut() {
                    *cell += self.0;
                }
            }
            Ok(out)
        }
    }

    fn full_window() -> SlidingWindow {
        let mut w = SlidingWindow::new();
        for _ in 0..WINDOW_SIZE {
            w.push(FeatureVector {
                rsrp: 0.5,
                rsrq: 0.5,
                sinr: 0.5,
            });
        }
        w
    }

    #[test]
    fn underfull_window_buffers() {
        let mut engine = ScoreEngine::new(Some(Box::new(Identity)));
        let mut w = SlidingWindow::new();
        for _ in 0..WINDOW_SIZE - 1 {
            w.push(FeatureVector {
                rsrp: 0.1,
                rsrq: 0.1,
                sinr: 0.1,
            });
            assert_eq!(engine.evaluate(&w), AnomalyResult::Buffering);
        }
    }

    #[test]
    fn perfect_reconstruction_scores_zero() {
        let mut engine = ScoreEngine::new(Some(Box::new(Identity)));
        assert_eq!(engine.evaluate(&full_window()), AnomalyResult::Normal(0.0));
    }

    #[test]
    fn constant_offset_below_threshold_is_normal() {
        // 0.3 offset in every cell -> mse 0.09 < 0.15
        let mut engine = ScoreEngine::new(Some(Box::new(Offset(0.3))));
        match engine.evaluate(&full_window()) {
            AnomalyResult::Normal(mse) => assert!((mse - 0.09).abs() < 1e-6),
            other => panic!("expected Normal, got {other:?}"),
        }
    }

    #[test]
    fn large_offset_flags_anomaly() {
        // 0.5 offset -> mse 0.25 > 0.15
        let mut engine = ScoreEngine::new(Some(Box::new(Offset(0.5))));
        match engine.evaluate(&full_window()) {
            AnomalyResult::Anomaly(mse) => assert!((mse - 0.25).abs() < 1e-6),
            other => panic!("expected Anomaly, got {other:?}"),
        }
    }

    #[test]
    fn missing_model_reports_unavailable() {
        let mut engine = ScoreEngine::new(None);
        assert_eq!(engine.evaluate(&full_window()), AnomalyResult::Unavailable);
        // stays unavailable, still distinct from Normal
        assert_eq!(engine.evaluate(&full_window()), AnomalyResult::Unavailable);
    }
}
