//! Server configuration

use lungscreen_classifiers::RegistryConfig;
use lungscreen_notify::NotifyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Models to serve, inline
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Separate models file; replaces `registry` when set
    #[serde(default)]
    pub models_config: Option<PathBuf>,

    /// Post-verdict side effects
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Maximum accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen: Option<String>,
    pub port: Option<u16>,
    pub models_config: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: impl AsRef<Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();

        // A missing file means defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Some(listen) = &overrides.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = overrides.port {
            config.port = port;
        }

        if let Some(models_config) = &overrides.models_config {
            config.models_config = Some(models_config.clone());
        }

        Ok(config)
    }

    /// Registry configuration to load at startup
    pub fn registry_config(&self) -> anyhow::Result<RegistryConfig> {
        match &self.models_config {
            Some(path) => Ok(RegistryConfig::from_file(path)?),
            None => Ok(self.registry.clone()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            registry: RegistryConfig::default(),
            models_config: None,
            notify: NotifyConfig::default(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}
