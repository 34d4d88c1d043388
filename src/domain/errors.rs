use thiserror::Error;

/// Errors raised by the forecasting pipeline.
///
/// Every variant fails the whole prediction; the only state that survives a
/// failed call is whatever training already completed on an earlier call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Invalid candle at {timestamp}: {reason}")]
    InvalidCandle { timestamp: i64, reason: String },

    #[error("Invalid sentiment at {timestamp}: {reason}")]
    InvalidSentiment { timestamp: i64, reason: String },

    #[error("Insufficient history: need at least {required} candles, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Too many candles: limit is {limit}, got {available}")]
    TooManyCandles { limit: usize, available: usize },

    #[error("Not enough data points. Need at least {required}, got {available}")]
    InsufficientCleanRows { required: usize, available: usize },

    #[error("Model training failed: {reason}")]
    TrainingFailure { reason: String },

    #[error("Inference failed: {reason}")]
    InferenceFailure { reason: String },
}

impl PredictionError {
    /// True for errors caused by the caller's input rather than by the model.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCandle { .. }
                | Self::InvalidSentiment { .. }
                | Self::InsufficientHistory { .. }
                | Self::TooManyCandles { .. }
                | Self::InsufficientCleanRows { .. }
        )
    }

    /// Short snake_case label, used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCandle { .. } => "invalid_candle",
            Self::InvalidSentiment { .. } => "invalid_sentiment",
            Self::InsufficientHistory { .. } => "insufficient_history",
            Self::TooManyCandles { .. } => "too_many_candles",
            Self::InsufficientCleanRows { .. } => "insufficient_clean_rows",
            Self::TrainingFailure { .. } => "training_failure",
            Self::InferenceFailure { .. } => "inference_failure",
        }
    }
}
