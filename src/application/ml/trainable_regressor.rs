use super::scaler::MinMaxScaler;
use crate::domain::errors::PredictionError;
use crate::domain::ports::RegressionModel;

/// A regression model behind a min–max normalizer fitted on its training set.
///
/// The scaler is fitted inside `fit` and reused unchanged by every later
/// `predict`. A failed `fit` leaves the previous scaler and model in place.
pub struct TrainableRegressor {
    scaler: Option<MinMaxScaler>,
    model: Box<dyn RegressionModel>,
}

impl TrainableRegressor {
    pub fn new(model: Box<dyn RegressionModel>) -> Self {
        Self {
            scaler: None,
            model,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn fit(&mut self, inputs: &[Vec<f64>], targets: &[f64]) -> Result<(), PredictionError> {
        if inputs.len() != targets.len() {
            return Err(PredictionError::TrainingFailure {
                reason: format!(
                    "{} input rows but {} targets",
                    inputs.len(),
                    targets.len()
                ),
            });
        }

        let scaler = MinMaxScaler::fit(inputs)?;
        let scaled = scaler
            .transform(inputs)
            .map_err(|e| PredictionError::TrainingFailure {
                reason: e.to_string(),
            })?;
        self.model.fit(&scaled, targets)?;
        self.scaler = Some(scaler);
        Ok(())
    }

    pub fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
        let scaler = self
            .scaler
            .as_ref()
            .ok_or_else(|| PredictionError::InferenceFailure {
                reason: "regressor has not been fitted".to_string(),
            })?;
        let scaled = scaler.transform(inputs)?;
        self.model.predict(&scaled)
    }

    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        self.model.feature_importances()
    }
}
