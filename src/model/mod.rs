//! Inference backends and model artifact location.

mod loader;
mod onnx;

pub use loader::{resolve_model_path, MODEL_ENV_VAR, MODEL_FILENAME};
pub use onnx::OnnxModel;

use crate::error::Result;
use crate::image::NormalizedTensor;

/// Flattened values of the model's first output tensor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawOutput(Vec<f32>);

impl RawOutput {
    #[must_use]
    pub const fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// The score used for classification.
    #[must_use]
    pub fn logit(&self) -> Option<f32> {
        self.0.first().copied()
    }

    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A loaded, read-only classifier.
///
/// Implementations must be safe to call from several threads; backends
/// whose runtime needs exclusive access serialize calls internally.
pub trait Model: Send + Sync {
    /// Run a forward pass and return the raw output unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error on shape mismatch or runtime failure.
    fn infer(&self, tensor: &NormalizedTensor) -> Result<RawOutput>;
}
