//! Image classification pipeline: normalize, infer, interpret.

mod config;
mod interpret;
mod orchestrator;

pub use config::Config;
pub use interpret::{interpret, sigmoid, Label, Verdict, DEFAULT_THRESHOLD};
pub use orchestrator::{run, Invocation, Outcome, Pipeline, State};
