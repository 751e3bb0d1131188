//! LungScreen Notify
//!
//! Best-effort side effects that follow a verdict: a hardware indicator per
//! label and, for high-risk verdicts, a link to search for nearby cancer
//! hospitals. Failures here are logged and never affect the verdict.

pub mod config;
pub mod error;
pub mod hospital;
pub mod location;
pub mod notifier;
pub mod signal;

pub use config::{HardwareConfig, HardwareMode, HospitalSearchConfig, NotifyConfig};
pub use error::NotifyError;
pub use hospital::hospital_search_url;
pub use location::{IpLocator, Location};
pub use notifier::{Notification, VerdictNotifier};
pub use signal::{detect_signal, HardwareSignal, LogSignal, NoopSignal};
