use crate::domain::errors::PredictionError;

/// Interface for the regression model behind the trainable regressor.
///
/// Inputs reaching the model are already normalized. Implementations must be
/// deterministic for a given fit so that repeated predictions on the same
/// window agree.
pub trait RegressionModel: Send + Sync {
    /// Fit on `inputs` (one row per sample) against `targets`.
    ///
    /// On error the model must be left as it was before the call.
    fn fit(&mut self, inputs: &[Vec<f64>], targets: &[f64]) -> Result<(), PredictionError>;

    /// Predict one value per input row.
    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError>;

    /// Per-input-dimension importance weights, when the model can provide them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    /// Get model name/type
    fn name(&self) -> &str;
}
