use super::sequence_builder::SequenceBuilder;
use super::smartcore_regressor::{RandomForestSettings, SmartCoreRandomForest};
use super::trainable_regressor::TrainableRegressor;
use crate::application::features::{IndicatorEngine, SentimentAligner};
use crate::domain::errors::PredictionError;
use crate::domain::market::candle::{CandlePoint, SentimentPoint, sorted_by_time};
use crate::domain::ml::feature_registry::{Feature, lagged_feature_names};
use crate::domain::ml::feature_row::{CleanRow, FeatureRow};
use crate::domain::ports::RegressionModel;
use crate::domain::validation::StrictInputValidator;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, error, info};

/// Number of most recent clean rows averaged for the confidence heuristic.
pub const CONFIDENCE_WINDOW: usize = 20;
pub const MIN_CONFIDENCE: f64 = 0.1;
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Result of one prediction call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub predicted_close: f64,
    /// Heuristic in [MIN_CONFIDENCE, MAX_CONFIDENCE]; not a statistical interval.
    pub confidence: f64,
    /// One name per flattened input slot, in flattening order.
    pub features_used: Vec<String>,
    /// Number of training samples when this call performed the one-time fit.
    pub trained_samples: Option<usize>,
}

struct ModelState {
    trained: bool,
    regressor: TrainableRegressor,
    feature_names: Vec<String>,
}

/// Next-close predictor with a lazy, train-once lifecycle.
///
/// The first successful call fits the regressor on the sequences of its own
/// candle history and then predicts from that same history. Later calls never
/// refit: the scaler and model stay frozen for the life of the predictor.
/// A failed fit leaves the predictor untrained so the next call tries again.
///
/// Training runs under the write lock, so concurrent first calls fit at most
/// once. Once trained, calls only take the read lock and run in parallel.
pub struct PricePredictor {
    engine: IndicatorEngine,
    aligner: SentimentAligner,
    builder: SequenceBuilder,
    state: RwLock<ModelState>,
}

impl PricePredictor {
    pub fn new(sequence_length: usize, model: Box<dyn RegressionModel>) -> Self {
        Self {
            engine: IndicatorEngine::new(),
            aligner: SentimentAligner::new(),
            builder: SequenceBuilder::new(sequence_length),
            state: RwLock::new(ModelState {
                trained: false,
                regressor: TrainableRegressor::new(model),
                feature_names: Vec::new(),
            }),
        }
    }

    pub fn random_forest(sequence_length: usize, settings: RandomForestSettings) -> Self {
        Self::new(
            sequence_length,
            Box::new(SmartCoreRandomForest::new(settings)),
        )
    }

    pub fn sequence_length(&self) -> usize {
        self.builder.sequence_length()
    }

    pub fn is_trained(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .trained
    }

    pub fn model_name(&self) -> String {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .regressor
            .model_name()
            .to_string()
    }

    /// Validates, sorts and annotates the candle history.
    pub fn prepare_features(
        &self,
        candles: &[CandlePoint],
        sentiment: Option<&[SentimentPoint]>,
    ) -> Result<Vec<FeatureRow>, PredictionError> {
        if candles.is_empty() {
            return Err(PredictionError::InsufficientHistory {
                required: 1,
                available: 0,
            });
        }
        StrictInputValidator::validate_candles(candles)?;
        if let Some(points) = sentiment {
            StrictInputValidator::validate_sentiment(points)?;
        }

        let sorted = sorted_by_time(candles);
        let rows = self.engine.compute(&sorted);
        Ok(self.aligner.align(&rows, sentiment))
    }

    pub fn predict(
        &self,
        candles: &[CandlePoint],
        sentiment: Option<&[SentimentPoint]>,
    ) -> Result<Prediction, PredictionError> {
        let rows = self.prepare_features(candles, sentiment)?;

        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if state.trained {
                return self.infer(&state, &rows, None);
            }
        }

        // A panicked fit never set `trained`, so a poisoned guard is retrained
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have trained while we waited for the write lock
        let trained_samples = if state.trained {
            None
        } else {
            info!("Training model with provided data...");
            Some(self.train(&mut state, &rows).inspect_err(|e| {
                error!("Error training model: {}", e);
            })?)
        };
        self.infer(&state, &rows, trained_samples)
    }

    fn train(&self, state: &mut ModelState, rows: &[FeatureRow]) -> Result<usize, PredictionError> {
        let set = self.builder.build(rows)?;
        state.regressor.fit(&set.inputs(), &set.targets())?;
        state.feature_names = set.feature_names;
        state.trained = true;

        info!("Model trained successfully with {} samples", set.sequences.len());
        Ok(set.sequences.len())
    }

    fn infer(
        &self,
        state: &ModelState,
        rows: &[FeatureRow],
        trained_samples: Option<usize>,
    ) -> Result<Prediction, PredictionError> {
        let set = self.builder.build(rows)?;
        let last = set
            .last()
            .ok_or_else(|| PredictionError::InsufficientCleanRows {
                required: self.builder.sequence_length() + 1,
                available: set.clean_rows.len(),
            })?;

        let predicted_close = state
            .regressor
            .predict(std::slice::from_ref(&last.inputs))
            .inspect_err(|e| error!("Error making prediction: {}", e))?
            .first()
            .copied()
            .ok_or_else(|| PredictionError::InferenceFailure {
                reason: "model returned no prediction".to_string(),
            })?;

        let features_used = lagged_feature_names(&state.feature_names, set.sequence_length);
        if let Some(importances) = state.regressor.feature_importances() {
            let top = importances
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .and_then(|(i, _)| features_used.get(i));
            debug!("Most important input: {:?}", top);
        }

        let confidence = confidence_from_volatility(&set.clean_rows);
        debug!(
            "Predicted close {:.4} with confidence {:.4} from {} clean rows",
            predicted_close,
            confidence,
            set.clean_rows.len()
        );

        Ok(Prediction {
            predicted_close,
            confidence,
            features_used,
            trained_samples,
        })
    }
}

/// `1 - mean(volatility)` over the last CONFIDENCE_WINDOW clean rows, clamped.
///
/// Higher recent volatility means lower confidence. A NaN mean collapses to
/// the floor.
pub fn confidence_from_volatility(clean_rows: &[CleanRow]) -> f64 {
    let recent = &clean_rows[clean_rows.len().saturating_sub(CONFIDENCE_WINDOW)..];
    let mean = recent
        .iter()
        .map(|row| row.get(Feature::Volatility))
        .sum::<f64>()
        / recent.len() as f64;
    (1.0 - mean).max(MIN_CONFIDENCE).min(MAX_CONFIDENCE)
}
