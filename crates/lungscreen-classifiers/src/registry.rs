//! Model registry initialization and management

use crate::config::RegistryConfig;
use crate::model::RiskModel;
use crate::model_loader::load_model;
use lungscreen_core::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Registered, read-only model together with the name it was registered under
#[derive(Clone)]
pub struct ModelHandle {
    name: Arc<str>,
    model: Arc<dyn RiskModel>,
}

impl ModelHandle {
    pub fn new(name: impl Into<Arc<str>>, model: Arc<dyn RiskModel>) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &dyn RiskModel {
        self.model.as_ref()
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name)
            .field("kind", &self.model.kind())
            .field("n_trees", &self.model.n_trees())
            .finish()
    }
}

/// Immutable set of named models.
///
/// Built once at startup; there is no way to add or replace a model
/// afterwards, so lookups and inference need no locking.
#[derive(Debug)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelHandle>,
    default_model: Option<String>,
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::new()
    }

    /// Eagerly load every configured model.
    ///
    /// Any artifact that fails to load aborts the whole registry: a
    /// partially loaded registry would turn a startup problem into
    /// per-request failures.
    pub fn load(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;

        info!("Initializing model registry with {} models", config.models.len());

        let mut builder = Self::builder();
        for name in config.model_names() {
            let source = config
                .to_model_source(&name)
                .ok_or_else(|| Error::config(format!("model {} not found in config", name)))?;

            info!("Loading model: {}", name);
            let model = load_model(&name, &source)?;
            info!(
                "Loaded model: {} ({}, {} trees)",
                name,
                model.kind(),
                model.n_trees()
            );

            builder = builder.register(name, model);
        }

        if let Some(default) = &config.default_model {
            builder = builder.default_model(default.clone());
        }

        let registry = builder.build()?;
        info!("Model registry initialized with {} models", registry.len());

        Ok(registry)
    }

    /// Look up a model by its registered name
    pub fn get(&self, name: &str) -> Result<ModelHandle> {
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_model(name, self.model_names()))
    }

    /// Check if a model is registered
    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Get list of registered model names (sorted)
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    /// Model to use when a caller does not choose one: the configured
    /// default, else the first registered name
    pub fn default_model(&self) -> &str {
        match &self.default_model {
            Some(name) => name,
            // build() guarantees at least one model
            None => self.models.keys().next().map(String::as_str).unwrap_or_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Collects models before freezing them into a [`ModelRegistry`]
#[derive(Default)]
pub struct ModelRegistryBuilder {
    models: BTreeMap<String, ModelHandle>,
    duplicates: Vec<String>,
    default_model: Option<String>,
}

impl ModelRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under a name
    pub fn register(mut self, name: impl Into<String>, model: Arc<dyn RiskModel>) -> Self {
        let name = name.into();
        if self.models.contains_key(&name) {
            self.duplicates.push(name);
        } else {
            let handle = ModelHandle::new(name.as_str(), model);
            self.models.insert(name, handle);
        }
        self
    }

    /// Set the model used when a caller does not choose one
    pub fn default_model(mut self, name: impl Into<String>) -> Self {
        self.default_model = Some(name.into());
        self
    }

    /// Freeze the registry
    pub fn build(self) -> Result<ModelRegistry> {
        if self.models.is_empty() {
            return Err(Error::config(
                "model registry is empty; at least one model is required",
            ));
        }

        if !self.duplicates.is_empty() {
            return Err(Error::config(format!(
                "models registered more than once: {}",
                self.duplicates.join(", ")
            )));
        }

        if let Some(default) = &self.default_model {
            if !self.models.contains_key(default) {
                return Err(Error::unknown_model(
                    default.clone(),
                    self.models.keys().cloned().collect(),
                ));
            }
        }

        Ok(ModelRegistry {
            models: self.models,
            default_model: self.default_model,
        })
    }
}

/// Initialize model registry from configuration
pub fn init_registry_from_config(config: &RegistryConfig) -> Result<ModelRegistry> {
    ModelRegistry::load(config)
}

/// Initialize registry from a YAML config file
pub fn init_registry_from_file(path: impl AsRef<Path>) -> Result<ModelRegistry> {
    let config = RegistryConfig::from_file(path)?;
    init_registry_from_config(&config)
}

/// Shared model registry for application-wide use
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    registry: Arc<ModelRegistry>,
}

impl SharedRegistry {
    /// Create a new shared registry
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Get reference to the registry
    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Clone the Arc for sharing across threads
    pub fn clone_arc(&self) -> Arc<ModelRegistry> {
        Arc::clone(&self.registry)
    }
}

impl Deref for SharedRegistry {
    type Target = ModelRegistry;

    fn deref(&self) -> &ModelRegistry {
        &self.registry
    }
}

impl From<ModelRegistry> for SharedRegistry {
    fn from(registry: ModelRegistry) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelKind;
    use lungscreen_core::{ErrorKind, FeatureVector};

    struct ConstantModel(usize);

    impl RiskModel for ConstantModel {
        fn predict(&self, _features: &FeatureVector) -> Result<usize> {
            Ok(self.0)
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f64>> {
            let mut proba = vec![0.0, 0.0];
            proba[self.0] = 1.0;
            Ok(proba)
        }

        fn kind(&self) -> ModelKind {
            ModelKind::Custom
        }
    }

    #[test]
    fn test_builder_registers_any_number_of_models() {
        let registry = ModelRegistry::builder()
            .register("a", Arc::new(ConstantModel(0)))
            .register("b", Arc::new(ConstantModel(1)))
            .register("c", Arc::new(ConstantModel(0)))
            .build()
            .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.model_names(), vec!["a", "b", "c"]);
        assert_eq!(registry.get("b").unwrap().name(), "b");
        assert_eq!(registry.default_model(), "a");
    }

    #[test]
    fn test_unknown_model() {
        let registry = ModelRegistry::builder()
            .register("Random Forest", Arc::new(ConstantModel(0)))
            .build()
            .unwrap();

        let err = registry.get("random forest").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownModel);
        assert!(!registry.has_model("XGBoost"));
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        let err = ModelRegistry::builder().build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let err = ModelRegistry::builder()
            .register("XGBoost", Arc::new(ConstantModel(0)))
            .register("XGBoost", Arc::new(ConstantModel(1)))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_default_must_be_registered() {
        let err = ModelRegistry::builder()
            .register("a", Arc::new(ConstantModel(0)))
            .default_model("b")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownModel);
    }

    #[test]
    fn test_shared_registry_clones_share_models() {
        let shared = SharedRegistry::new(
            ModelRegistry::builder()
                .register("a", Arc::new(ConstantModel(1)))
                .build()
                .unwrap(),
        );
        let other = shared.clone();

        assert!(Arc::ptr_eq(shared.registry(), other.registry()));
        assert_eq!(other.model_names(), vec!["a"]);
    }
}
