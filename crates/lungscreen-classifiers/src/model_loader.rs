//! Model artifact resolution and loading

use crate::artifact::ModelArtifact;
use crate::model::RiskModel;
use lungscreen_core::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Source location for a model artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Load from local file system
    LocalPath(PathBuf),

    /// Download from Hugging Face Hub
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
        filename: String,
    },
}

impl ModelSource {
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self::LocalPath(path.into())
    }

    pub fn from_hf(repo_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: None,
            filename: filename.into(),
        }
    }

    /// Set Hugging Face revision
    pub fn with_revision(self, revision: impl Into<String>) -> Self {
        match self {
            Self::HuggingFace {
                repo_id, filename, ..
            } => Self::HuggingFace {
                repo_id,
                revision: Some(revision.into()),
                filename,
            },
            local => local,
        }
    }
}

/// Load and validate the model behind `source`.
///
/// Every failure is reported as [`Error::ModelLoad`] carrying `name`.
pub fn load_model(name: &str, source: &ModelSource) -> Result<Arc<dyn RiskModel>> {
    let path = resolve_artifact_path(source).map_err(|e| Error::model_load(name, e.to_string()))?;

    let artifact = ModelArtifact::from_file(&path).map_err(|e| {
        Error::model_load(name, format!("cannot read {}: {}", path.display(), e))
    })?;

    artifact
        .into_model()
        .map_err(|e| Error::model_load(name, format!("{}: {}", path.display(), e)))
}

/// Resolve the artifact to a local file, downloading if needed
pub fn resolve_artifact_path(source: &ModelSource) -> Result<PathBuf> {
    match source {
        ModelSource::LocalPath(path) => {
            if !path.exists() {
                return Err(Error::config(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace {
            repo_id,
            revision,
            filename,
        } => download_from_hub(repo_id, revision.as_deref(), filename),
    }
}

#[cfg(feature = "hub")]
fn download_from_hub(repo_id: &str, revision: Option<&str>, filename: &str) -> Result<PathBuf> {
    use hf_hub::{api::sync::Api, Repo, RepoType};

    tracing::info!(
        "Downloading model artifact from Hugging Face: {}/{} @ {}",
        repo_id,
        filename,
        revision.unwrap_or("main")
    );

    let api = Api::new()
        .map_err(|e| Error::config(format!("failed to initialize HF API: {}", e)))?;

    let repo = api.repo(Repo::with_revision(
        repo_id.to_string(),
        RepoType::Model,
        revision.unwrap_or("main").to_string(),
    ));

    repo.get(filename)
        .map_err(|e| Error::config(format!("failed to download model from HF: {}", e)))
}

#[cfg(not(feature = "hub"))]
fn download_from_hub(repo_id: &str, _revision: Option<&str>, filename: &str) -> Result<PathBuf> {
    Err(Error::config(format!(
        "cannot fetch {}/{}: built without the `hub` feature",
        repo_id, filename
    )))
}
