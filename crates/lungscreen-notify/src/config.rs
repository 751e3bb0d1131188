//! Notifier configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens after a verdict is produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub hardware: HardwareConfig,

    #[serde(default)]
    pub hospital_search: HospitalSearchConfig,

    /// Per-attempt timeout for the IP location lookup
    #[serde(default = "default_locate_timeout_ms")]
    pub locate_timeout_ms: u64,

    /// Extra attempts after the first failed lookup
    #[serde(default = "default_locate_retries")]
    pub locate_retries: u32,

    /// Bound on the whole lookup, retries and backoff included
    #[serde(default = "default_locate_deadline_ms")]
    pub locate_deadline_ms: u64,

    /// Geolocation endpoint returning `{"city": .., "region": ..}`
    #[serde(default = "default_locate_url")]
    pub locate_url: String,
}

impl NotifyConfig {
    pub fn locate_timeout(&self) -> Duration {
        Duration::from_millis(self.locate_timeout_ms)
    }

    pub fn locate_deadline(&self) -> Duration {
        Duration::from_millis(self.locate_deadline_ms)
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            hardware: HardwareConfig::default(),
            hospital_search: HospitalSearchConfig::default(),
            locate_timeout_ms: default_locate_timeout_ms(),
            locate_retries: default_locate_retries(),
            locate_deadline_ms: default_locate_deadline_ms(),
            locate_url: default_locate_url(),
        }
    }
}

/// Indicator outputs raised per verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareConfig {
    #[serde(default)]
    pub mode: HardwareMode,

    #[serde(default = "default_high_risk_pin")]
    pub high_risk_pin: u8,

    #[serde(default = "default_low_risk_pin")]
    pub low_risk_pin: u8,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            mode: HardwareMode::None,
            high_risk_pin: default_high_risk_pin(),
            low_risk_pin: default_low_risk_pin(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HardwareMode {
    /// No indicator attached
    #[default]
    None,
    /// Log the pin that would be raised
    Log,
}

/// Hospital search link for high-risk verdicts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalSearchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Used when the caller gives no location and auto-location is off or fails
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Look the location up from the server's public IP
    #[serde(default)]
    pub auto_locate: bool,
}

impl Default for HospitalSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_location: default_location(),
            auto_locate: false,
        }
    }
}

fn default_locate_timeout_ms() -> u64 {
    2000
}

fn default_locate_retries() -> u32 {
    2
}

fn default_locate_deadline_ms() -> u64 {
    3000
}

fn default_locate_url() -> String {
    "https://ipinfo.io/json".to_string()
}

fn default_high_risk_pin() -> u8 {
    18
}

fn default_low_risk_pin() -> u8 {
    23
}

fn default_location() -> String {
    "Jaipur".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NotifyConfig::default();
        assert_eq!(config.hardware.mode, HardwareMode::None);
        assert_eq!(config.hardware.high_risk_pin, 18);
        assert_eq!(config.hardware.low_risk_pin, 23);
        assert!(config.hospital_search.enabled);
        assert!(!config.hospital_search.auto_locate);
        assert_eq!(config.hospital_search.default_location, "Jaipur");
        assert_eq!(config.locate_timeout(), Duration::from_secs(2));
        assert_eq!(config.locate_deadline(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
hardware:
  mode: log
hospital_search:
  auto_locate: true
locate_retries: 0
"#;
        let config: NotifyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.hardware.mode, HardwareMode::Log);
        assert_eq!(config.hardware.high_risk_pin, 18);
        assert!(config.hospital_search.enabled);
        assert!(config.hospital_search.auto_locate);
        assert_eq!(config.hospital_search.default_location, "Jaipur");
        assert_eq!(config.locate_retries, 0);
        assert_eq!(config.locate_url, "https://ipinfo.io/json");
    }
}
