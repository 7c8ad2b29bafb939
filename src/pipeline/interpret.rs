//! Conversion of the raw model score into a labeled verdict.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::RawOutput;

/// Probability above which a lesion is reported as malignant.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Malignant,
    Benign,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malignant => f.write_str("MALIGNANT"),
            Self::Benign => f.write_str("BENIGN"),
        }
    }
}

/// Final result of one classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    label: Label,
    confidence_percent: f64,
    probability: f64,
}

impl Verdict {
    #[must_use]
    pub const fn label(&self) -> Label {
        self.label
    }

    /// Confidence in the reported label, in [0, 100].
    #[must_use]
    pub const fn confidence_percent(&self) -> f64 {
        self.confidence_percent
    }

    /// Sigmoid of the logit, i.e. the malignancy probability in [0, 1].
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Label::Malignant => write!(
                f,
                "Malignant lesion detected with confidence: {:.2}%",
                self.confidence_percent
            ),
            Label::Benign => write!(
                f,
                "No malignancy detected with confidence: {:.2}%",
                self.confidence_percent
            ),
        }
    }
}

/// Logistic function. Saturates to 0 or 1 for logits of large magnitude.
#[must_use]
pub fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

/// Turn the first model output into a verdict.
///
/// Only index 0 is read; any further values are ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `threshold` is outside [0, 1]
/// or NaN, [`Error::EmptyOutput`] if the output has no values and
/// [`Error::NonFiniteLogit`] if the logit is NaN.
pub fn interpret(output: &RawOutput, threshold: f64) -> Result<Verdict> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::InvalidParameter {
            name: "threshold".to_string(),
            reason: format!("must be between 0.0 and 1.0, got {threshold}"),
        });
    }

    let logit = output.logit().ok_or(Error::EmptyOutput)?;
    if logit.is_nan() {
        return Err(Error::NonFiniteLogit { value: logit });
    }

    let probability = sigmoid(f64::from(logit));
    let (label, confidence) = if probability > threshold {
        (Label::Malignant, probability)
    } else {
        (Label::Benign, 1.0 - probability)
    };

    Ok(Verdict {
        label,
        confidence_percent: confidence * 100.0,
        probability,
    })
}
