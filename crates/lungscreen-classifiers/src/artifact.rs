//! Serialized model artifacts
//!
//! Trained models are exported as a tree-ensemble document, JSON or YAML:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "feature_names": ["yellow_fingers", "anxiety", "...", "yellow_fingers_anxiety"],
//!   "model": {
//!     "kind": "gradient_boosting",
//!     "base_score": 0.5,
//!     "trees": [
//!       {"nodes": [
//!         {"type": "split", "feature": 8, "threshold": 0.5, "left": 1, "right": 2},
//!         {"type": "leaf", "value": [-0.35]},
//!         {"type": "leaf", "value": [0.42]}
//!       ]}
//!     ]
//!   }
//! }
//! ```
//!
//! `feature_names` must list [`FEATURE_NAMES`] in order, so an artifact
//! trained on a different column layout is refused at load time.

use crate::boosting::{GradientBoostedTrees, DEFAULT_BASE_SCORE};
use crate::forest::RandomForest;
use crate::model::{ModelKind, RiskModel};
use crate::tree::DecisionTree;
use lungscreen_core::{Error, Result, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Artifact format understood by this crate
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// A serialized, trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,

    /// Column names the model was trained on, in order
    pub feature_names: Vec<String>,

    /// Free-form provenance note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub model: ModelSpec,
}

/// Model family and parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    RandomForest {
        #[serde(default = "default_n_classes")]
        n_classes: usize,
        trees: Vec<DecisionTree>,
    },

    GradientBoosting {
        #[serde(default = "default_base_score")]
        base_score: f64,
        trees: Vec<DecisionTree>,
    },
}

fn default_n_classes() -> usize {
    2
}

fn default_base_score() -> f64 {
    DEFAULT_BASE_SCORE
}

impl ModelSpec {
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::RandomForest { .. } => ModelKind::RandomForest,
            Self::GradientBoosting { .. } => ModelKind::GradientBoosting,
        }
    }
}

impl ModelArtifact {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read an artifact file; `.yaml`/`.yml` is parsed as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Check the version and feature contract
    pub fn validate_contract(&self) -> Result<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(Error::invalid_artifact(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        if self.feature_names.len() != FEATURE_NAMES.len() {
            return Err(Error::invalid_artifact(format!(
                "model expects {} features, encoder produces {}",
                self.feature_names.len(),
                FEATURE_NAMES.len()
            )));
        }

        let mismatch = self
            .feature_names
            .iter()
            .zip(FEATURE_NAMES)
            .enumerate()
            .find(|(_, (declared, expected))| declared.as_str() != *expected);

        if let Some((i, (declared, expected))) = mismatch {
            return Err(Error::invalid_artifact(format!(
                "feature {} is '{}', expected '{}'",
                i, declared, expected
            )));
        }

        Ok(())
    }

    /// Validate and build the runnable model
    pub fn into_model(self) -> Result<Arc<dyn RiskModel>> {
        self.validate_contract()?;

        let model: Arc<dyn RiskModel> = match self.model {
            ModelSpec::RandomForest { n_classes, trees } => {
                if n_classes != 2 {
                    return Err(Error::invalid_artifact(format!(
                        "risk models are binary, artifact declares {} classes",
                        n_classes
                    )));
                }
                Arc::new(RandomForest::new(trees, n_classes)?)
            }
            ModelSpec::GradientBoosting { base_score, trees } => {
                Arc::new(GradientBoostedTrees::new(trees, base_score)?)
            }
        };

        Ok(model)
    }
}
