//! LungScreen Classifiers
//!
//! Symptom-to-risk inference: feature encoding, tree-ensemble models loaded
//! from serialized artifacts, a registry of named models, and the risk
//! classifier that ties them together.
//!
//! Models are loaded eagerly into an immutable registry at startup and are
//! read-only afterwards, so a single registry can serve concurrent requests
//! without locking.

pub mod artifact;
pub mod boosting;
pub mod config;
pub mod encoder;
pub mod forest;
pub mod model;
pub mod model_loader;
pub mod registry;
pub mod risk;
pub mod tree;

pub use artifact::{ModelArtifact, ModelSpec, ARTIFACT_FORMAT_VERSION};
pub use boosting::GradientBoostedTrees;
pub use config::{ModelConfigSpec, ModelSourceSpec, RegistryConfig, RANDOM_FOREST, XGBOOST};
pub use encoder::FeatureEncoder;
pub use forest::RandomForest;
pub use model::{ModelKind, Prediction, RiskModel};
pub use model_loader::{load_model, ModelSource};
pub use registry::{
    init_registry_from_config, init_registry_from_file, ModelHandle, ModelRegistry,
    ModelRegistryBuilder, SharedRegistry,
};
pub use risk::{classify, classify_record, RiskClassifier};
pub use tree::{DecisionTree, TreeNode};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::encoder::FeatureEncoder;
    pub use crate::model::{ModelKind, RiskModel};
    pub use crate::registry::{ModelRegistry, SharedRegistry};
    pub use crate::risk::RiskClassifier;
    pub use lungscreen_core::prelude::*;
}
