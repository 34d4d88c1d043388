use crate::domain::errors::PredictionError;
use crate::domain::market::candle::{CandlePoint, SentimentPoint};
use std::collections::HashSet;
use tracing::warn;

/// Centralized validator for request data integrity.
///
/// Rejects data that is physically impossible before any feature is computed.
pub struct StrictInputValidator;

impl StrictInputValidator {
    /// Validates a single candle.
    pub fn validate_candle(candle: &CandlePoint) -> Result<(), PredictionError> {
        // `!(x > 0)` also rejects NaN
        let prices = [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
        ];
        for (field, value) in prices {
            if !(value > 0.0) {
                warn!(
                    "Validation FAILED: candle {} has non-positive {}: {}",
                    candle.timestamp, field, value
                );
                return Err(PredictionError::InvalidCandle {
                    timestamp: candle.timestamp,
                    reason: format!("{field} must be > 0, got {value}"),
                });
            }
        }

        if !(candle.volume >= 0.0) {
            warn!(
                "Validation FAILED: candle {} has negative volume: {}",
                candle.timestamp, candle.volume
            );
            return Err(PredictionError::InvalidCandle {
                timestamp: candle.timestamp,
                reason: format!("volume must be >= 0, got {}", candle.volume),
            });
        }

        Ok(())
    }

    /// Validates every candle and the uniqueness of their timestamps.
    pub fn validate_candles(candles: &[CandlePoint]) -> Result<(), PredictionError> {
        let mut seen = HashSet::with_capacity(candles.len());
        for candle in candles {
            Self::validate_candle(candle)?;
            if !seen.insert(candle.timestamp) {
                warn!(
                    "Validation FAILED: duplicate candle timestamp {}",
                    candle.timestamp
                );
                return Err(PredictionError::InvalidCandle {
                    timestamp: candle.timestamp,
                    reason: "duplicate timestamp".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn validate_sentiment(points: &[SentimentPoint]) -> Result<(), PredictionError> {
        for point in points {
            if !(-1.0..=1.0).contains(&point.sentiment_score) {
                warn!(
                    "Validation FAILED: sentiment {} has score out of range: {}",
                    point.timestamp, point.sentiment_score
                );
                return Err(PredictionError::InvalidSentiment {
                    timestamp: point.timestamp,
                    reason: format!(
                        "sentiment_score must be within [-1, 1], got {}",
                        point.sentiment_score
                    ),
                });
            }
        }
        Ok(())
    }
}
