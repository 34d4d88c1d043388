//! Observability configuration parsing from environment variables.

use super::parse_or;
use anyhow::Result;
use std::env;

/// Observability environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    /// Seconds between JSON metric snapshots
    pub interval_seconds: u64,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 60,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            enabled: parse_or(&lookup, "OBSERVABILITY_ENABLED", defaults.enabled)?,
            interval_seconds: parse_or(
                &lookup,
                "OBSERVABILITY_INTERVAL",
                defaults.interval_seconds,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::from_vars(|_| None).unwrap();
        assert!(config.enabled);
        assert_eq!(config.interval_seconds, 60);
    }

    #[test]
    fn test_observability_disabled() {
        let config = ObservabilityEnvConfig::from_vars(|key| {
            (key == "OBSERVABILITY_ENABLED").then(|| "false".to_string())
        })
        .unwrap();
        assert!(!config.enabled);
        assert!(
            ObservabilityEnvConfig::from_vars(|_| Some("sometimes".to_string())).is_err()
        );
    }
}
