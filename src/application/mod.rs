// Indicator computation and sentiment alignment
pub mod features;

// Sequence building, scaling and the train-once predictor
pub mod ml;

// Request boundary
pub mod prediction_service;
pub mod request_loop;

pub use prediction_service::{
    CandleInput, HealthStatus, PredictionRequest, PredictionResponse, PredictionService,
};
