//! # `lesionscan`
//!
//! Binary skin-lesion classification from a single photo.
//!
//! An image is resized to 224x224, standardized with the ImageNet channel
//! statistics and passed to a pretrained network. The first output value is
//! treated as a malignancy logit: its sigmoid is compared against a decision
//! threshold (0.3 by default) to produce a [`Verdict`].
//!
//! ## Example
//!
//! ```no_run
//! use lesionscan::{image, Config, Pipeline};
//!
//! # fn main() -> lesionscan::Result<()> {
//! let pipeline = Pipeline::load(Config::default())?;
//!
//! let photo = image::load_image("lesion.jpg")?;
//! match pipeline.classify(photo) {
//!     Ok(verdict) => println!("{verdict}"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::{Error, PipelineError, Result, Stage};
pub use model::{Model, OnnxModel, RawOutput};
pub use pipeline::{Config, Label, Outcome, Pipeline, Verdict};
