//! Dense autoencoder deserialized from a JSON weights artifact.
//!
//! The artifact is a list of fully connected layers exported by the training
//! pipeline: `weights` is row-major `[out][in]`, `bias` has one entry per
//! output. The network maps a flattened window (`WINDOW_SIZE * FEATURE_COUNT`
//! inputs) back onto itself.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{ModelError, ReconstructionModel, WindowTensor};
use crate::collector::features::FEATURE_COUNT;
use crate::collector::window::WINDOW_SIZE;

const IO_DIM: usize = WINDOW_SIZE * FEATURE_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Activation {
    Relu,
    Sigmoid,
    Linear,
}

impl Activation {
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Linear => x,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DenseLayer {
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
    activation: Activation,
}

#[derive(Debug, Deserialize)]
pub struct DenseAutoencoder {
    layers: Vec<DenseLayer>,
}

impl DenseAutoencoder {
    /// Load and shape-check the weights artifact.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let bytes = fs::read(path)?;
        let model: DenseAutoencoder = serde_json::from_slice(&bytes)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        // an empty network would reconstruct every window perfectly and mask
        // all anomalies; treat it as a broken artifact
        if self.layers.is_empty() {
            return Err(ModelError::Shape {
                expected: IO_DIM,
                got: 0,
            });
        }
        let mut dim = IO_DIM;
        for layer in &self.layers {
            if layer.bias.len() != layer.weights.len() {
                return Err(ModelError::Shape {
                    expected: layer.weights.len(),
                    got: layer.bias.len(),
                });
            }
            for row in &layer.weights {
                if row.len() != dim {
                    return Err(ModelError::Shape {
                        expected: dim,
                        got: row.len(),
                    });
                }
            }
            dim = layer.weights.len();
        }
        if dim != IO_DIM {
            return Err(ModelError::Shape {
                expected: IO_DIM,
                got: dim,
            });
        }
        Ok(())
    }

    fn forward(&self, mut x: Vec<f32>) -> Vec<f32> {
        for layer in &self.layers {
            let mut y = Vec::with_capacity(layer.bias.len());
            for (row, bias) in layer.weights.iter().zip(&layer.bias) {
                let mut acc = *bias;
                for (w, xi) in row.iter().zip(&x) {
                    acc += w * xi;
                }
                y.push(layer.activation.apply(acc));
            }
            x = y;
        }
        x
    }
}

impl ReconstructionModel for DenseAutoencoder {
    fn infer(&self, input: &WindowTensor) -> Result<WindowTensor, ModelError> {
        let flat: Vec<f32> = input.iter().flatten().copied().collect();
        let out = self.forward(flat);
        if out.len() != IO_DIM {
            return Err(ModelError::Shape {
                expected: IO_DIM,
                got: out.len(),
            });
        }
        let mut tensor = [[0.0_f32; FEATURE_COUNT]; WINDOW_SIZE];
        for (i, chunk) in out.chunks_exact(FEATURE_COUNT).enumerate() {
            tensor[i].copy_from_slice(chunk);
        }
        Ok(tensor)
    }
}
