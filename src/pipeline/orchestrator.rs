//! Normalize, infer and interpret a single image.

use std::sync::Arc;

use crate::error::{PipelineError, Result, Stage};
use crate::image::{self, Acquisition, Interpolation, RawImage};
use crate::model::{resolve_model_path, Model, OnnxModel};

use super::config::Config;
use super::interpret::{interpret, Verdict};

/// Progress of one invocation.
///
/// Every invocation starts at `Idle`; `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Normalizing,
    Inferring,
    Interpreting,
    Done,
    Failed(Stage),
}

impl State {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

/// State tracker for one pass through the pipeline.
#[derive(Debug)]
pub struct Invocation {
    state: State,
}

impl Default for Invocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Invocation {
    #[must_use]
    pub const fn new() -> Self {
        Self { state: State::Idle }
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    fn enter(&mut self, next: State) {
        tracing::debug!("Pipeline state {:?} -> {next:?}", self.state);
        self.state = next;
    }

    /// Run one stage, moving to `Failed(stage)` if it errors.
    fn stage<T>(
        &mut self,
        state: State,
        stage: Stage,
        f: impl FnOnce() -> Result<T>,
    ) -> std::result::Result<T, PipelineError> {
        self.enter(state);
        f().map_err(|source| {
            self.enter(State::Failed(stage));
            PipelineError::new(stage, source)
        })
    }

    /// Drive the invocation to completion, consuming it.
    ///
    /// Returns the terminal state (`Done` or `Failed(stage)`) together with
    /// the verdict or the first stage error. Later stages are not run after
    /// a failure.
    #[must_use]
    pub fn run(
        mut self,
        raw: RawImage,
        model: &dyn Model,
        threshold: f64,
        interpolation: Interpolation,
    ) -> (State, std::result::Result<Verdict, PipelineError>) {
        let result = self.drive(raw, model, threshold, interpolation);
        (self.state, result)
    }

    fn drive(
        &mut self,
        raw: RawImage,
        model: &dyn Model,
        threshold: f64,
        interpolation: Interpolation,
    ) -> std::result::Result<Verdict, PipelineError> {
        let tensor = self.stage(State::Normalizing, Stage::Normalize, || {
            image::normalize(raw, interpolation)
        })?;

        let output = self.stage(State::Inferring, Stage::Inference, || model.infer(&tensor))?;

        tracing::debug!("Model output ({} values): {:?}", output.len(), output.values());
        if output.len() > 1 {
            tracing::warn!(
                "Model returned {} values; only the first is used as the malignancy logit",
                output.len()
            );
        }

        let verdict = self.stage(State::Interpreting, Stage::Interpret, || {
            interpret(&output, threshold)
        })?;

        self.enter(State::Done);
        Ok(verdict)
    }
}

/// Classify one image against a loaded model.
///
/// Runs normalize, inference and interpretation in order. Blocks for the
/// duration of the forward pass.
///
/// # Errors
///
/// Returns a [`PipelineError`] naming the stage that failed.
pub fn run(
    image: RawImage,
    model: &dyn Model,
    threshold: f64,
) -> std::result::Result<Verdict, PipelineError> {
    let (_, result) = Invocation::new().run(image, model, threshold, Interpolation::default());
    result
}

/// What the display side receives for one acquisition.
#[derive(Debug)]
pub enum Outcome {
    /// The image was classified.
    Classified(Verdict),
    /// A pipeline stage failed.
    Failed(PipelineError),
    /// The user cancelled acquisition; nothing was classified.
    Cancelled,
    /// The acquisition source produced no image.
    AcquisitionFailed(String),
}

/// Classification pipeline bound to a loaded model.
pub struct Pipeline {
    config: Config,
    model: Arc<dyn Model>,
}

impl Pipeline {
    /// Create a pipeline around an already loaded model.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config, model: Arc<dyn Model>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, model })
    }

    /// Create a pipeline, loading the ONNX model the configuration points to.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the model cannot
    /// be loaded. Load failures satisfy [`crate::Error::is_model_load`].
    pub fn load(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing pipeline with config: {config:?}");

        let path = resolve_model_path(config.model_path.as_deref());
        let model = OnnxModel::load(&path, config.intra_threads)?;

        tracing::info!("Pipeline initialized with {}", model.path().display());

        Ok(Self {
            config,
            model: Arc::new(model),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Classify one image.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] naming the stage that failed.
    pub fn classify(&self, image: RawImage) -> std::result::Result<Verdict, PipelineError> {
        tracing::info!("Classifying {}x{} image", image.width(), image.height());

        let (_, result) = Invocation::new().run(
            image,
            self.model.as_ref(),
            self.config.threshold,
            self.config.interpolation,
        );
        let verdict = result?;

        tracing::info!(
            label = %verdict.label(),
            confidence = verdict.confidence_percent(),
            "Classification complete"
        );
        Ok(verdict)
    }

    /// Route an acquisition result; only captured images reach the model.
    pub fn handle(&self, acquisition: Acquisition) -> Outcome {
        match acquisition {
            Acquisition::Captured(image) => match self.classify(image) {
                Ok(verdict) => Outcome::Classified(verdict),
                Err(err) => {
                    tracing::error!("{err}");
                    Outcome::Failed(err)
                }
            },
            Acquisition::Cancelled => {
                tracing::info!("Acquisition cancelled");
                Outcome::Cancelled
            }
            Acquisition::Failed(reason) => {
                tracing::warn!("Acquisition failed: {reason}");
                Outcome::AcquisitionFailed(reason)
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::image::NormalizedTensor;
    use crate::model::RawOutput;
    use crate::pipeline::Label;

    struct Fixed(Vec<f32>);

    impl Model for Fixed {
        fn infer(&self, _tensor: &NormalizedTensor) -> Result<RawOutput> {
            Ok(RawOutput::new(self.0.clone()))
        }
    }

    struct Broken;

    impl Model for Broken {
        fn infer(&self, tensor: &NormalizedTensor) -> Result<RawOutput> {
            Err(Error::ShapeMismatch {
                expected: "[1, 3, 299, 299]".to_string(),
                actual: format!("{:?}", tensor.shape()),
            })
        }
    }

    fn gray() -> RawImage {
        RawImage::from_raw(8, 8, 3, vec![128; 8 * 8 * 3])
    }

    #[test]
    fn test_fresh_invocation_is_idle() {
        let invocation = Invocation::new();
        assert_eq!(invocation.state(), State::Idle);
        assert!(!invocation.state().is_terminal());
    }

    #[test]
    fn test_states_on_success() {
        let (state, result) =
            Invocation::new().run(gray(), &Fixed(vec![2.0]), 0.3, Interpolation::Bilinear);

        assert_eq!(result.unwrap().label(), Label::Malignant);
        assert_eq!(state, State::Done);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_states_on_failure() {
        let (state, result) =
            Invocation::new().run(gray(), &Broken, 0.3, Interpolation::Bilinear);

        assert_eq!(result.unwrap_err().stage, Stage::Inference);
        assert_eq!(state, State::Failed(Stage::Inference));
    }

    #[test]
    fn test_normalize_failure_state() {
        let empty = RawImage::from_raw(0, 0, 3, Vec::new());
        let (state, result) =
            Invocation::new().run(empty, &Fixed(vec![0.0]), 0.3, Interpolation::Bilinear);

        assert_eq!(result.unwrap_err().stage, Stage::Normalize);
        assert_eq!(state, State::Failed(Stage::Normalize));
    }

    #[test]
    fn test_interpret_failure_is_tagged() {
        let err = run(gray(), &Fixed(Vec::new()), 0.3).unwrap_err();
        assert_eq!(err.stage, Stage::Interpret);
        assert!(matches!(err.source, Error::EmptyOutput));
    }

    #[test]
    fn test_nan_threshold_is_interpret_error() {
        let err = run(gray(), &Fixed(vec![50.0]), f64::NAN).unwrap_err();
        assert_eq!(err.stage, Stage::Interpret);
        assert!(matches!(err.source, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_each_invocation_starts_idle() {
        let model = Fixed(vec![0.0]);
        let (first, _) = Invocation::new().run(gray(), &Broken, 0.3, Interpolation::Bilinear);
        let (second, result) = Invocation::new().run(gray(), &model, 0.3, Interpolation::Bilinear);

        assert_eq!(first, State::Failed(Stage::Inference));
        assert_eq!(second, State::Done);
        assert!(result.is_ok());
    }

    #[test]
    fn test_pipeline_rejects_invalid_config() {
        let config = Config {
            threshold: 3.0,
            ..Config::default()
        };
        assert!(Pipeline::new(config, Arc::new(Fixed(vec![0.0]))).is_err());
    }

    #[test]
    fn test_load_missing_model() {
        let config = Config {
            model_path: Some("definitely/missing/model.onnx".into()),
            ..Config::default()
        };
        let err = Pipeline::load(config).unwrap_err();
        assert!(err.is_model_load());
    }
}
