//! Hardware indicator signals
//!
//! A deployment may wire an indicator per verdict label. Nothing here
//! drives real pins; [`LogSignal`] records which pin would be raised.

use crate::config::{HardwareConfig, HardwareMode};
use crate::error::Result;
use lungscreen_core::RiskLabel;
use std::sync::Arc;
use tracing::info;

/// Raises an indicator for a verdict label
pub trait HardwareSignal: Send + Sync {
    fn signal(&self, label: RiskLabel) -> Result<()>;

    /// Name for logs
    fn name(&self) -> &str;
}

/// No indicator attached
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSignal;

impl HardwareSignal for NoopSignal {
    fn signal(&self, _label: RiskLabel) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Logs the pin that would be raised
#[derive(Debug, Clone, Copy)]
pub struct LogSignal {
    high_risk_pin: u8,
    low_risk_pin: u8,
}

impl LogSignal {
    pub fn new(high_risk_pin: u8, low_risk_pin: u8) -> Self {
        Self {
            high_risk_pin,
            low_risk_pin,
        }
    }

    /// Pin assigned to `label`
    pub fn pin_for(&self, label: RiskLabel) -> u8 {
        match label {
            RiskLabel::HighRisk => self.high_risk_pin,
            RiskLabel::LowRisk => self.low_risk_pin,
        }
    }
}

impl HardwareSignal for LogSignal {
    fn signal(&self, label: RiskLabel) -> Result<()> {
        info!(pin = self.pin_for(label), label = label.as_str(), "Raising indicator");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Pick the signal for this deployment
pub fn detect_signal(config: &HardwareConfig) -> Arc<dyn HardwareSignal> {
    match config.mode {
        HardwareMode::None => Arc::new(NoopSignal),
        HardwareMode::Log => {
            info!(
                "Hardware indicators: high risk on pin {}, low risk on pin {}",
                config.high_risk_pin, config.low_risk_pin
            );
            Arc::new(LogSignal::new(config.high_risk_pin, config.low_risk_pin))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pins_per_label() {
        let signal = LogSignal::new(18, 23);
        assert_eq!(signal.pin_for(RiskLabel::HighRisk), 18);
        assert_eq!(signal.pin_for(RiskLabel::LowRisk), 23);
        assert!(signal.signal(RiskLabel::HighRisk).is_ok());
    }

    #[test]
    fn test_detect_signal() {
        let none = detect_signal(&HardwareConfig::default());
        assert_eq!(none.name(), "none");

        let log = detect_signal(&HardwareConfig {
            mode: HardwareMode::Log,
            ..HardwareConfig::default()
        });
        assert_eq!(log.name(), "log");
        assert!(log.signal(RiskLabel::LowRisk).is_ok());
    }
}
