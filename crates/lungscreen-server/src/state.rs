//! Application state shared across requests

use anyhow::Context;
use lungscreen_classifiers::{ModelRegistry, RiskClassifier};
use lungscreen_notify::VerdictNotifier;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Classifier over the read-only model registry
    pub classifier: RiskClassifier,

    /// Post-verdict side effects
    pub notifier: Arc<VerdictNotifier>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Load every configured model and set up notifiers.
    ///
    /// A model that fails to load is fatal: the server never starts with a
    /// partial registry.
    pub fn new(config: ServerConfig, metrics_handle: PrometheusHandle) -> anyhow::Result<Self> {
        info!("Initializing application state");

        let registry_config = config.registry_config()?;
        let registry =
            ModelRegistry::load(&registry_config).context("failed to load model registry")?;
        info!(
            "Serving {} models (default: {})",
            registry.len(),
            registry.default_model()
        );

        let notifier = VerdictNotifier::from_config(&config.notify)
            .context("failed to initialize notifiers")?;
        info!("Hardware signal: {}", notifier.signal_name());

        Ok(Self::from_parts(config, registry, notifier, metrics_handle))
    }

    /// Assemble state from already built parts
    pub fn from_parts(
        config: ServerConfig,
        registry: ModelRegistry,
        notifier: VerdictNotifier,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            classifier: RiskClassifier::new(registry),
            notifier: Arc::new(notifier),
            metrics_handle,
        }
    }
}
