//! ONNX Runtime backend.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ort::session::Session;
use ort::value::TensorRef;

use crate::error::{Error, Result};
use crate::image::{NormalizedTensor, INPUT_SIZE, RGB_CHANNELS};

use super::{Model, RawOutput};

/// A classifier exported to ONNX.
///
/// `Session::run` requires `&mut self`, so the session sits behind a mutex
/// and concurrent callers are served one at a time.
pub struct OnnxModel {
    path: PathBuf,
    session: Mutex<Session>,
}

impl OnnxModel {
    /// Load an ONNX model session from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] if the file is missing and
    /// [`Error::ModelLoad`] if ONNX Runtime rejects it.
    pub fn load<P: AsRef<Path>>(path: P, intra_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Error::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        tracing::info!("Loading model from {}", path.display());

        let load_err = |source| Error::ModelLoad {
            path: path.to_path_buf(),
            source,
        };
        let session = Session::builder()
            .map_err(load_err)?
            .with_intra_threads(intra_threads)
            .map_err(load_err)?
            .commit_from_file(path)
            .map_err(load_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            session: Mutex::new(session),
        })
    }

    /// Path the model was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Model for OnnxModel {
    fn infer(&self, tensor: &NormalizedTensor) -> Result<RawOutput> {
        check_input_shape(tensor)?;

        let input =
            TensorRef::from_array_view(tensor).map_err(|source| Error::Inference { source })?;

        let mut session = self.session.lock().map_err(|_| Error::SessionPoisoned)?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|source| Error::Inference { source })?;

        // Get first output
        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "at least one output".to_string(),
                actual: "no output".to_string(),
            })?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|source| Error::Inference { source })?;

        Ok(RawOutput::new(data.to_vec()))
    }
}

/// Reject tensors that are not a single 224x224 RGB image.
fn check_input_shape(tensor: &NormalizedTensor) -> Result<()> {
    let size = INPUT_SIZE as usize;
    if tensor.shape() != [1, RGB_CHANNELS, size, size] {
        return Err(Error::ShapeMismatch {
            expected: format!("[1, {RGB_CHANNELS}, {size}, {size}]"),
            actual: format!("{:?}", tensor.shape()),
        });
    }
    Ok(())
}
