//! Error types for LungScreen

/// Result type alias using LungScreen's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for LungScreen operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A form field is missing or outside the yes/no domain
    #[error("encoding error: field '{field}' {reason}")]
    Encoding { field: String, reason: String },

    /// The requested model is not registered
    #[error("unknown model '{name}' (available: {})", .available.join(", "))]
    UnknownModel { name: String, available: Vec<String> },

    /// The model failed to produce a usable prediction
    #[error("inference error: {0}")]
    Inference(String),

    /// A model artifact could not be resolved, parsed, or validated
    #[error("failed to load model '{name}': {reason}")]
    ModelLoad { name: String, reason: String },

    /// A model artifact is structurally invalid
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Coarse error category, for callers that dispatch on the kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Encoding,
    UnknownModel,
    Inference,
    ModelLoad,
    Config,
    Io,
    Serialization,
}

impl ErrorKind {
    /// Stable snake_case name, used as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encoding => "encoding",
            Self::UnknownModel => "unknown_model",
            Self::Inference => "inference",
            Self::ModelLoad => "model_load",
            Self::Config => "config",
            Self::Io => "io",
            Self::Serialization => "serialization",
        }
    }
}

impl Error {
    /// Create a new encoding error for a named field
    pub fn encoding(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encoding {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unknown-model error
    pub fn unknown_model(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownModel {
            name: name.into(),
            available,
        }
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new model load error
    pub fn model_load(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid artifact error
    pub fn invalid_artifact(msg: impl Into<String>) -> Self {
        Self::InvalidArtifact(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::UnknownModel { .. } => ErrorKind::UnknownModel,
            Self::Inference(_) => ErrorKind::Inference,
            Self::ModelLoad { .. } | Self::InvalidArtifact(_) => ErrorKind::ModelLoad,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Serialization(_) | Self::Yaml(_) => ErrorKind::Serialization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_lists_available() {
        let err = Error::unknown_model(
            "SVM",
            vec!["Random Forest".to_string(), "XGBoost".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "unknown model 'SVM' (available: Random Forest, XGBoost)"
        );
        assert_eq!(err.kind(), ErrorKind::UnknownModel);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            Error::encoding("anxiety", "is missing"),
            Error::unknown_model("x", vec![]),
            Error::inference("shape mismatch"),
        ];
        let kinds: Vec<_> = errors.iter().map(Error::kind).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::Encoding, ErrorKind::UnknownModel, ErrorKind::Inference]
        );
    }
}
