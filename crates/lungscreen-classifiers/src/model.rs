//! Model capability trait and common types

use lungscreen_core::{FeatureVector, Result};
use std::fmt;

/// Capability shared by every registered model.
///
/// Implementations are read-only after construction, so one instance can
/// serve concurrent predictions without coordination.
pub trait RiskModel: Send + Sync {
    /// Predicted class index (0 = low risk, 1 = high risk)
    fn predict(&self, features: &FeatureVector) -> Result<usize>;

    /// Probability for each class, indexed by class
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>>;

    /// Predicted class and distribution in one call.
    ///
    /// Models that derive the class from the distribution should override
    /// this to avoid evaluating twice.
    fn predict_with_proba(&self, features: &FeatureVector) -> Result<Prediction> {
        Ok(Prediction {
            class: self.predict(features)?,
            probabilities: self.predict_proba(features)?,
        })
    }

    /// Model family
    fn kind(&self) -> ModelKind;

    /// Number of trees in the ensemble (0 for non-tree models)
    fn n_trees(&self) -> usize {
        0
    }
}

/// Raw model output before it is turned into a verdict
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: usize,
    pub probabilities: Vec<f64>,
}

/// Model family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Bagged decision trees with averaged leaf class distributions
    RandomForest,
    /// Boosted regression trees with a logistic link
    GradientBoosting,
    /// Anything implemented outside this crate
    Custom,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest",
            Self::GradientBoosting => "gradient_boosting",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
