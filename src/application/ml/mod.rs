pub mod predictor;
pub mod scaler;
pub mod sequence_builder;
pub mod smartcore_regressor;
pub mod trainable_regressor;

pub use predictor::{Prediction, PricePredictor};
pub use scaler::MinMaxScaler;
pub use sequence_builder::SequenceBuilder;
pub use smartcore_regressor::{RandomForestSettings, SmartCoreRandomForest};
pub use trainable_regressor::TrainableRegressor;
