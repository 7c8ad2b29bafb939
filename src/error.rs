//! Custom error types for lesionscan.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the lesionscan library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to decode an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image cannot be fed to the normalizer.
    #[error("invalid image {width}x{height} with {channels} channel(s): {reason}")]
    InvalidImage {
        width: u32,
        height: u32,
        channels: u8,
        reason: String,
    },

    /// The model artifact does not exist.
    #[error("model artifact not found at {path}")]
    ModelNotFound { path: PathBuf },

    /// Failed to load an ONNX model.
    #[error("failed to load ONNX model {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// The inference session lock was poisoned by a panicking caller.
    #[error("inference session lock poisoned")]
    SessionPoisoned,

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// The model produced no values.
    #[error("model output is empty")]
    EmptyOutput,

    /// The logit cannot be mapped to a probability.
    #[error("model logit is not a number: {value}")]
    NonFiniteLogit { value: f32 },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Failed to read a configuration file.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file.
    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    /// Whether this error means no model is available for the session.
    ///
    /// Such failures happen once at startup and make every later inference
    /// impossible, unlike the per-image errors.
    #[must_use]
    pub const fn is_model_load(&self) -> bool {
        matches!(self, Self::ModelNotFound { .. } | Self::ModelLoad { .. })
    }
}

/// Result type alias for lesionscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an invocation failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Normalize,
    Inference,
    Interpret,
}

impl Stage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normalize => "normalize",
            Self::Inference => "inference",
            Self::Interpret => "interpret",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed pipeline invocation, tagged with the stage that failed.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl PipelineError {
    #[must_use]
    pub const fn new(stage: Stage, source: Error) -> Self {
        Self { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_load_classification() {
        let missing = Error::ModelNotFound {
            path: PathBuf::from("model.onnx"),
        };
        assert!(missing.is_model_load());
        assert!(!Error::EmptyOutput.is_model_load());
        assert!(!Error::SessionPoisoned.is_model_load());
    }

    #[test]
    fn test_pipeline_error_message() {
        let err = PipelineError::new(Stage::Interpret, Error::EmptyOutput);
        assert_eq!(err.to_string(), "interpret stage failed: model output is empty");
        assert!(std::error::Error::source(&err).is_some());
    }
}
