//! Output formatting for classification outcomes.

use std::path::Path;

use serde_json::{json, Value};

use crate::pipeline::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Use 'text' or 'json'.")),
        }
    }
}

/// Render the outcome for one image.
#[must_use]
pub fn render(source: &Path, outcome: &Outcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(source, outcome),
        OutputFormat::Json => render_json(source, outcome).to_string(),
    }
}

fn render_text(source: &Path, outcome: &Outcome) -> String {
    let message = match outcome {
        Outcome::Classified(verdict) => verdict.to_string(),
        Outcome::Failed(err) => format!("Error during {} stage: {}", err.stage, err.source),
        Outcome::Cancelled => "Acquisition cancelled.".to_string(),
        Outcome::AcquisitionFailed(reason) => format!("Could not acquire image: {reason}"),
    };
    format!("{}: {message}", source.display())
}

fn render_json(source: &Path, outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Classified(verdict) => json!({
            "source": source,
            "status": "classified",
            "verdict": verdict,
        }),
        Outcome::Failed(err) => json!({
            "source": source,
            "status": "failed",
            "stage": err.stage,
            "error": err.source.to_string(),
        }),
        Outcome::Cancelled => json!({
            "source": source,
            "status": "cancelled",
        }),
        Outcome::AcquisitionFailed(reason) => json!({
            "source": source,
            "status": "acquisition_failed",
            "error": reason,
        }),
    }
}
