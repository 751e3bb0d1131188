//! Configuration for the model registry

use crate::model_loader::ModelSource;
use lungscreen_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the default random forest model
pub const RANDOM_FOREST: &str = "Random Forest";

/// Name of the default gradient-boosted model
pub const XGBOOST: &str = "XGBoost";

/// Models to load at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Model artifacts by registered name
    #[serde(default)]
    pub models: BTreeMap<String, ModelConfigSpec>,

    /// Model used when a request does not name one
    #[serde(default)]
    pub default_model: Option<String>,

    /// Base directory for relative local paths
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
}

/// Model configuration specification (for YAML/config files)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfigSpec {
    /// Where the artifact lives
    #[serde(flatten)]
    pub source: ModelSourceSpec,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

/// Model source specification (for config files)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSourceSpec {
    /// Local file path
    Local { path: PathBuf },

    /// Hugging Face Hub
    HuggingFace {
        repo_id: String,
        filename: String,
        revision: Option<String>,
    },
}

impl ModelConfigSpec {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ModelSourceSpec::Local { path: path.into() },
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let mut models = BTreeMap::new();
        models.insert(
            RANDOM_FOREST.to_string(),
            ModelConfigSpec::local("rf_model.json")
                .with_description("Random forest over the eleven symptoms plus interaction"),
        );
        models.insert(
            XGBOOST.to_string(),
            ModelConfigSpec::local("xgb_model.json")
                .with_description("Gradient-boosted trees over the same features"),
        );

        Self {
            models,
            default_model: Some(RANDOM_FOREST.to_string()),
            models_dir: Some(PathBuf::from("./models")),
        }
    }
}

impl RegistryConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read models config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Check the configuration is loadable before touching any artifact
    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(Error::config(
                "no models configured; at least one model is required to serve predictions",
            ));
        }

        if let Some(default) = &self.default_model {
            if !self.models.contains_key(default) {
                return Err(Error::config(format!(
                    "default model '{}' is not among the configured models ({})",
                    default,
                    self.model_names().join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Convert to a resolved source for loading
    pub fn to_model_source(&self, name: &str) -> Option<ModelSource> {
        let spec = self.models.get(name)?;

        let source = match &spec.source {
            ModelSourceSpec::Local { path } => ModelSource::LocalPath(self.resolve_local(path)),
            ModelSourceSpec::HuggingFace {
                repo_id,
                filename,
                revision,
            } => ModelSource::HuggingFace {
                repo_id: repo_id.clone(),
                revision: revision.clone(),
                filename: filename.clone(),
            },
        };

        Some(source)
    }

    fn resolve_local(&self, path: &Path) -> PathBuf {
        match &self.models_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Get all model names
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }
}
