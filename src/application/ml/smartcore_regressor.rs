use crate::domain::errors::PredictionError;
use crate::domain::ports::RegressionModel;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::{debug, error};

/// Hyperparameters for the random forest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomForestSettings {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for RandomForestSettings {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor backed by smartcore. Seeded, so fits are reproducible.
pub struct SmartCoreRandomForest {
    settings: RandomForestSettings,
    model: Option<Forest>,
}

impl SmartCoreRandomForest {
    pub fn new(settings: RandomForestSettings) -> Self {
        Self {
            settings,
            model: None,
        }
    }

    fn parameters(&self) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters::default()
            .with_n_trees(self.settings.n_trees)
            .with_max_depth(self.settings.max_depth)
            .with_min_samples_split(self.settings.min_samples_split)
            .with_seed(self.settings.seed)
    }
}

impl RegressionModel for SmartCoreRandomForest {
    fn fit(&mut self, inputs: &[Vec<f64>], targets: &[f64]) -> Result<(), PredictionError> {
        let x = DenseMatrix::from_2d_vec(&inputs.to_vec()).map_err(|e| {
            PredictionError::TrainingFailure {
                reason: format!("Matrix creation failed: {}", e),
            }
        })?;
        let y = targets.to_vec();

        debug!(
            "Training Random Forest Regressor (Trees: {}, Depth: {}, MinSplit: {}) on {} samples",
            self.settings.n_trees,
            self.settings.max_depth,
            self.settings.min_samples_split,
            y.len()
        );

        match Forest::fit(&x, &y, self.parameters()) {
            Ok(model) => {
                self.model = Some(model);
                Ok(())
            }
            Err(e) => {
                error!("Random forest training failed: {}", e);
                Err(PredictionError::TrainingFailure {
                    reason: format!("Training error: {}", e),
                })
            }
        }
    }

    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| PredictionError::InferenceFailure {
                reason: "random forest has not been trained".to_string(),
            })?;

        let x = DenseMatrix::from_2d_vec(&inputs.to_vec()).map_err(|e| {
            PredictionError::InferenceFailure {
                reason: format!("Matrix creation failed: {}", e),
            }
        })?;

        model
            .predict(&x)
            .map_err(|e| PredictionError::InferenceFailure {
                reason: format!("Prediction failed: {}", e),
            })
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
