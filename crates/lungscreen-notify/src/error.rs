//! Notifier errors
//!
//! None of these reach a caller of [`crate::VerdictNotifier::notify`]; they
//! are logged and swallowed there. They are public so individual notifiers
//! can be used and tested on their own.

/// Result type alias for notifier operations
pub type Result<T> = std::result::Result<T, NotifyError>;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// IP geolocation lookup failed
    #[error("location lookup failed: {0}")]
    Locate(String),

    /// Hardware signal could not be raised
    #[error("hardware signal on pin {pin} failed: {reason}")]
    Hardware { pin: u8, reason: String },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl NotifyError {
    pub fn locate(msg: impl Into<String>) -> Self {
        Self::Locate(msg.into())
    }

    pub fn hardware(pin: u8, reason: impl Into<String>) -> Self {
        Self::Hardware {
            pin,
            reason: reason.into(),
        }
    }
}
