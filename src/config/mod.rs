//! Configuration module.
//!
//! Structured configuration loading from environment variables, organized
//! by concern: Model, Service and Observability.

mod model_config;
mod observability_config;
mod service_config;

pub use model_config::ModelEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use service_config::ServiceEnvConfig;

use anyhow::{Context, Result};
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub model: ModelEnvConfig,
    pub service: ServiceEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            model: ModelEnvConfig::from_env().context("Failed to load model config")?,
            service: ServiceEnvConfig::from_env().context("Failed to load service config")?,
            observability: ObservabilityEnvConfig::from_env()
                .context("Failed to load observability config")?,
        })
    }

    pub fn from_vars<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        Ok(Self {
            model: ModelEnvConfig::from_vars(&lookup).context("Failed to load model config")?,
            service: ServiceEnvConfig::from_vars(&lookup)
                .context("Failed to load service config")?,
            observability: ObservabilityEnvConfig::from_vars(&lookup)
                .context("Failed to load observability config")?,
        })
    }
}

/// Parses `key` with `lookup`, falling back to `default` when it is unset.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}
