//! Risk classification output

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    HighRisk,
    LowRisk,
}

impl RiskLabel {
    /// Map a model class index (1 = positive) to a label
    pub fn from_class(class: usize) -> Option<Self> {
        match class {
            0 => Some(Self::LowRisk),
            1 => Some(Self::HighRisk),
            _ => None,
        }
    }

    pub fn class_index(self) -> usize {
        match self {
            Self::LowRisk => 0,
            Self::HighRisk => 1,
        }
    }

    /// Stable snake_case name, used as a metrics label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighRisk => "high_risk",
            Self::LowRisk => "low_risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighRisk => f.write_str("High Risk"),
            Self::LowRisk => f.write_str("Low Risk"),
        }
    }
}

/// Result of classifying one symptom record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub label: RiskLabel,

    /// Probability the model assigned to its own predicted class (0.0-1.0).
    ///
    /// For a `LowRisk` verdict this is confidence in low risk, not the
    /// probability of high risk.
    pub confidence: f64,

    /// Registered name of the model that produced the verdict
    pub model: String,
}

impl RiskVerdict {
    pub fn new(label: RiskLabel, confidence: f64, model: impl Into<String>) -> Self {
        Self {
            label,
            confidence,
            model: model.into(),
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.label == RiskLabel::HighRisk
    }

    /// Confidence as a percentage (0.0-100.0)
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

impl fmt::Display for RiskVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}% confidence, {})",
            self.label,
            self.confidence_percent(),
            self.model
        )
    }
}
