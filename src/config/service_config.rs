//! Service limits and response shaping.

use super::parse_or;
use anyhow::{Result, ensure};
use std::env;

/// Service environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEnvConfig {
    /// Fewest candles a request may carry
    pub min_candles: usize,
    /// Most candles a request may carry
    pub max_candles: usize,
    pub model_version: String,
    /// How many entries of `features_used` are returned
    pub features_display_limit: usize,
}

impl Default for ServiceEnvConfig {
    fn default() -> Self {
        Self {
            min_candles: 100,
            max_candles: 1000,
            model_version: "1.0.0".to_string(),
            features_display_limit: 10,
        }
    }
}

impl ServiceEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            min_candles: parse_or(&lookup, "MIN_CANDLES", defaults.min_candles)?,
            max_candles: parse_or(&lookup, "MAX_CANDLES", defaults.max_candles)?,
            model_version: lookup("MODEL_VERSION").unwrap_or(defaults.model_version),
            features_display_limit: parse_or(
                &lookup,
                "FEATURES_DISPLAY_LIMIT",
                defaults.features_display_limit,
            )?,
        };

        ensure!(
            config.min_candles <= config.max_candles,
            "MIN_CANDLES ({}) exceeds MAX_CANDLES ({})",
            config.min_candles,
            config.max_candles
        );
        Ok(config)
    }
}
