//! Verdict side effects

use crate::config::{HospitalSearchConfig, NotifyConfig};
use crate::error::Result;
use crate::hospital::hospital_search_url;
use crate::location::IpLocator;
use crate::signal::{detect_signal, HardwareSignal, NoopSignal};
use lungscreen_core::{RiskLabel, RiskVerdict};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_LOCATE_DEADLINE: Duration = Duration::from_secs(3);

/// What was done for one verdict
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notification {
    /// Hardware indicator raised successfully
    pub signalled: bool,

    /// Location the hospital link was built for
    pub location: Option<String>,

    /// Hospital search link, high-risk verdicts only
    pub hospital_search_url: Option<Url>,
}

/// Runs the best-effort side effects of a verdict.
///
/// Nothing here can fail a prediction: every error is logged and the
/// corresponding part of the [`Notification`] is left empty.
pub struct VerdictNotifier {
    signal: Arc<dyn HardwareSignal>,
    locator: Option<IpLocator>,
    locate_deadline: Duration,
    hospital_search: HospitalSearchConfig,
}

impl VerdictNotifier {
    pub fn new(
        signal: Arc<dyn HardwareSignal>,
        locator: Option<IpLocator>,
        hospital_search: HospitalSearchConfig,
    ) -> Self {
        Self {
            signal,
            locator,
            locate_deadline: DEFAULT_LOCATE_DEADLINE,
            hospital_search,
        }
    }

    /// Bound on the whole auto-location step, retries included
    pub fn with_locate_deadline(mut self, deadline: Duration) -> Self {
        self.locate_deadline = deadline;
        self
    }

    /// Build from configuration; the locator only exists when auto-locate is on
    pub fn from_config(config: &NotifyConfig) -> Result<Self> {
        let locator = if config.hospital_search.auto_locate {
            Some(IpLocator::from_config(config)?)
        } else {
            None
        };

        Ok(Self::new(
            detect_signal(&config.hardware),
            locator,
            config.hospital_search.clone(),
        )
        .with_locate_deadline(config.locate_deadline()))
    }

    /// No hardware, no lookups, no links
    pub fn disabled() -> Self {
        Self::new(
            Arc::new(NoopSignal),
            None,
            HospitalSearchConfig {
                enabled: false,
                ..HospitalSearchConfig::default()
            },
        )
    }

    pub fn signal_name(&self) -> &str {
        self.signal.name()
    }

    /// Signal hardware and, for a high-risk verdict, build the hospital link.
    ///
    /// Location precedence: `location` if non-blank, then auto-location
    /// (when enabled and successful), then the configured default.
    pub async fn notify(&self, verdict: &RiskVerdict, location: Option<&str>) -> Notification {
        let signalled = match self.signal.signal(verdict.label) {
            Ok(()) => true,
            Err(e) => {
                warn!(signal = self.signal.name(), error = %e, "Hardware signal failed");
                false
            }
        };

        if verdict.label != RiskLabel::HighRisk || !self.hospital_search.enabled {
            return Notification {
                signalled,
                ..Notification::default()
            };
        }

        let location = self.resolve_location(location).await;
        let hospital_search_url = location.as_deref().and_then(hospital_search_url);

        Notification {
            signalled,
            location,
            hospital_search_url,
        }
    }

    async fn resolve_location(&self, explicit: Option<&str>) -> Option<String> {
        if let Some(location) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
            return Some(location.to_string());
        }

        if let Some(locator) = &self.locator {
            match tokio::time::timeout(self.locate_deadline, locator.locate()).await {
                Ok(Ok(found)) => {
                    if let Some(text) = found.search_text() {
                        debug!("Using detected location");
                        return Some(text);
                    }
                    warn!("Location lookup returned no city or region");
                }
                Ok(Err(e)) => warn!(error = %e, "Falling back to default location"),
                Err(_) => warn!(
                    deadline_ms = self.locate_deadline.as_millis() as u64,
                    "Location lookup timed out, falling back to default location"
                ),
            }
        }

        let default = self.hospital_search.default_location.trim();
        (!default.is_empty()).then(|| default.to_string())
    }
}

impl std::fmt::Debug for VerdictNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerdictNotifier")
            .field("signal", &self.signal.name())
            .field("locator", &self.locator.as_ref().map(IpLocator::endpoint))
            .field("locate_deadline", &self.locate_deadline)
            .field("hospital_search", &self.hospital_search)
            .finish()
    }
}
