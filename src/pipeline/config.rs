//! Pipeline configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::image::Interpolation;

use super::interpret::DEFAULT_THRESHOLD;

/// Configuration for the classification pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Malignancy probability above which a lesion is reported as malignant.
    pub threshold: f64,

    /// Resampling filter for resizing to the model resolution.
    pub interpolation: Interpolation,

    /// Model artifact location. Resolved from the environment when unset.
    pub model_path: Option<PathBuf>,

    /// Threads ONNX Runtime may use within a single operator.
    pub intra_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            interpolation: Interpolation::default(),
            model_path: None,
            intra_threads: 4,
        }
    }
}

impl Config {
    /// Read a configuration from a TOML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidParameter {
                name: "threshold".to_string(),
                reason: "must be between 0.0 and 1.0".to_string(),
            });
        }

        if self.intra_threads == 0 {
            return Err(Error::InvalidParameter {
                name: "intra_threads".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
