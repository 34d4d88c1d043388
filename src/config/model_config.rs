//! Model configuration parsing from environment variables.
//!
//! Sequence length and random forest hyperparameters.

use super::parse_or;
use crate::application::ml::RandomForestSettings;
use crate::application::ml::sequence_builder::DEFAULT_SEQUENCE_LENGTH;
use anyhow::{Result, ensure};
use std::env;

/// Model environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub sequence_length: usize,
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        let forest = RandomForestSettings::default();
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            n_trees: forest.n_trees,
            max_depth: forest.max_depth,
            min_samples_split: forest.min_samples_split,
            seed: forest.seed,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            sequence_length: parse_or(&lookup, "SEQUENCE_LENGTH", defaults.sequence_length)?,
            n_trees: parse_or(&lookup, "RF_N_TREES", defaults.n_trees)?,
            max_depth: parse_or(&lookup, "RF_MAX_DEPTH", defaults.max_depth)?,
            min_samples_split: parse_or(
                &lookup,
                "RF_MIN_SAMPLES_SPLIT",
                defaults.min_samples_split,
            )?,
            seed: parse_or(&lookup, "RF_SEED", defaults.seed)?,
        };

        ensure!(config.sequence_length >= 1, "SEQUENCE_LENGTH must be at least 1");
        ensure!(config.n_trees >= 1, "RF_N_TREES must be at least 1");
        Ok(config)
    }

    pub fn forest_settings(&self) -> RandomForestSettings {
        RandomForestSettings {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            seed: self.seed,
        }
    }
}
