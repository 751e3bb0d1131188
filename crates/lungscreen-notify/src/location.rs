//! Approximate location from the host's public IP

use crate::config::NotifyConfig;
use crate::error::{NotifyError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Where the lookup service places us
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

impl Location {
    /// "city region", skipping blank parts; `None` if both are blank
    pub fn search_text(&self) -> Option<String> {
        let parts: Vec<&str> = [self.city.as_deref(), self.region.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Geolocation client with a per-attempt timeout and bounded retries
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    endpoint: String,
    retries: u32,
    backoff: Duration,
}

impl IpLocator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, retries: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lungscreen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            retries,
            backoff: INITIAL_BACKOFF,
        })
    }

    pub fn from_config(config: &NotifyConfig) -> Result<Self> {
        Self::new(
            config.locate_url.clone(),
            config.locate_timeout(),
            config.locate_retries,
        )
    }

    /// Delay before the first retry; doubles on each further retry
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Look up the current location, retrying transient failures
    pub async fn locate(&self) -> Result<Location> {
        let mut last_err = None;

        for attempt in 0..=self.retries {
            if attempt > 0 {
                let delay = self.backoff * 2u32.saturating_pow(attempt - 1);
                tokio::time::sleep(delay).await;
            }

            match self.fetch().await {
                Ok(location) => {
                    debug!("Location lookup succeeded on attempt {}", attempt + 1);
                    return Ok(location);
                }
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max = self.retries + 1,
                        error = %e,
                        "Location lookup failed"
                    );
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| NotifyError::locate("no lookup attempted")))
    }

    async fn fetch(&self) -> Result<Location> {
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::locate(format!(
                "{} returned {}",
                self.endpoint,
                response.status()
            )));
        }

        Ok(response.json::<Location>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(city: Option<&str>, region: Option<&str>) -> Location {
        Location {
            city: city.map(String::from),
            region: region.map(String::from),
        }
    }

    #[test]
    fn test_search_text() {
        assert_eq!(
            location(Some("Jaipur"), Some("Rajasthan")).search_text().as_deref(),
            Some("Jaipur Rajasthan")
        );
        assert_eq!(
            location(None, Some("Rajasthan")).search_text().as_deref(),
            Some("Rajasthan")
        );
        assert_eq!(location(Some(" "), None).search_text(), None);
        assert_eq!(Location::default().search_text(), None);
    }

    #[test]
    fn test_from_config() {
        let locator = IpLocator::from_config(&NotifyConfig::default()).unwrap();
        assert_eq!(locator.endpoint(), "https://ipinfo.io/json");
        assert_eq!(locator.retries, 2);
    }
}
