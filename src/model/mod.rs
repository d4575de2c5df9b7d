//! Reconstruction model boundary.
//!
//! The pipeline consumes the model as an opaque function: a full window of
//! normalized samples in, a reconstruction of the same shape out. The
//! concrete model is a dense autoencoder loaded once at startup from a
//! bundled weights artifact; a load failure is not fatal, it just puts the
//! scorer into its unavailable state for the session.

pub mod autoencoder;

pub use autoencoder::DenseAutoencoder;

use crate::collector::features::FEATURE_COUNT;
use crate::collector::window::WINDOW_SIZE;

pub type WindowTensor = [[f32; FEATURE_COUNT]; WINDOW_SIZE];

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model shape mismatch: expected {expected}, got {got}")]
    Shape { expected: usize, got: usize },
}

/// Black-box reconstruction function over one window.
pub trait ReconstructionModel: Send {
    fn infer(&self, input: &WindowTensor) -> Result<WindowTensor, ModelError>;
}
