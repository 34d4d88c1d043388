use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, Feature, feature_names};
use crate::domain::ml::feature_row::{CleanRow, FeatureRow};
use crate::domain::ml::sequence::{Sequence, SequenceSet};
use tracing::debug;

pub const DEFAULT_SEQUENCE_LENGTH: usize = 20;

/// Turns a feature table into flattened lag windows and next-close labels.
///
/// Rows with any undefined feature are dropped first. Window `i` covers clean
/// rows `i..i + sequence_length` and is labelled with the close of clean row
/// `i + sequence_length`. Inputs are flattened feature by feature: all lags
/// of `price_change`, then all lags of `high_low_pct`, and so on.
#[derive(Debug, Clone, Copy)]
pub struct SequenceBuilder {
    sequence_length: usize,
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SEQUENCE_LENGTH)
    }
}

impl SequenceBuilder {
    pub fn new(sequence_length: usize) -> Self {
        Self { sequence_length }
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Length of every flattened input vector.
    pub fn input_width(&self) -> usize {
        FEATURE_COUNT * self.sequence_length
    }

    pub fn clean_rows(rows: &[FeatureRow]) -> Vec<CleanRow> {
        rows.iter().filter_map(FeatureRow::to_clean).collect()
    }

    pub fn build(&self, rows: &[FeatureRow]) -> Result<SequenceSet, PredictionError> {
        let clean_rows = Self::clean_rows(rows);
        let required = self.sequence_length + 1;
        if clean_rows.len() < required {
            return Err(PredictionError::InsufficientCleanRows {
                required,
                available: clean_rows.len(),
            });
        }

        let sequences: Vec<Sequence> = clean_rows
            .windows(required)
            .map(|chunk| {
                let (window, next) = chunk.split_at(self.sequence_length);
                Sequence {
                    inputs: self.flatten(window),
                    label: next[0].close,
                }
            })
            .collect();

        debug!(
            "Built {} sequences from {} clean rows ({} dropped)",
            sequences.len(),
            clean_rows.len(),
            rows.len() - clean_rows.len()
        );

        Ok(SequenceSet {
            feature_names: feature_names(),
            sequence_length: self.sequence_length,
            sequences,
            clean_rows,
        })
    }

    fn flatten(&self, window: &[CleanRow]) -> Vec<f64> {
        let mut inputs = Vec::with_capacity(self.input_width());
        for feature in Feature::ALL {
            inputs.extend(window.iter().map(|row| row.get(feature)));
        }
        inputs
    }
}
