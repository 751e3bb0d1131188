//! Feature vector contract shared with the trained models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features consumed by every model
pub const FEATURE_COUNT: usize = 12;

/// Index of the derived `yellow_fingers * anxiety` feature
pub const INTERACTION_INDEX: usize = FEATURE_COUNT - 1;

/// Feature names in the order the models were trained on.
///
/// Model artifacts declare the same list; a mismatch is rejected on load.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "yellow_fingers",
    "anxiety",
    "peer_pressure",
    "chronic_disease",
    "fatigue",
    "allergy",
    "wheezing",
    "alcohol",
    "coughing",
    "swallowing_difficulty",
    "chest_pain",
    "yellow_fingers_anxiety",
];

/// Fixed-order numeric input to a model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Value of the derived interaction feature
    pub fn interaction(&self) -> f64 {
        self.0[INTERACTION_INDEX]
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::ops::Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}
