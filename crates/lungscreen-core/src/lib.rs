//! LungScreen Core
//!
//! Core types and error handling shared across LungScreen components.
//!
//! This crate provides:
//! - Patient symptom input types (raw form and validated record)
//! - The fixed-order feature vector contract shared with the trained models
//! - Risk verdict types
//! - Error types and result handling

pub mod error;
pub mod features;
pub mod types;
pub mod verdict;

pub use error::{Error, ErrorKind, Result};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES, INTERACTION_INDEX};
pub use types::{Answer, FormAnswer, Symptom, SymptomForm, SymptomRecord, SYMPTOM_COUNT};
pub use verdict::{RiskLabel, RiskVerdict};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::features::FeatureVector;
    pub use crate::types::{Answer, Symptom, SymptomForm, SymptomRecord};
    pub use crate::verdict::{RiskLabel, RiskVerdict};
}
