use crate::application::ml::{Prediction, PricePredictor};
use crate::config::ServiceEnvConfig;
use crate::domain::errors::PredictionError;
use crate::domain::market::{CandlePoint, SentimentPoint};
use crate::infrastructure::binance::parse_kline;
use crate::infrastructure::observability::{LatencyGuard, Metrics};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

fn default_symbol() -> String {
    "UNKNOWN".to_string()
}

/// A candle as an object or as a Binance kline array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CandleInput {
    Point(CandlePoint),
    Kline(Vec<serde_json::Value>),
}

impl CandleInput {
    pub fn to_candle(&self) -> Result<CandlePoint, PredictionError> {
        match self {
            Self::Point(candle) => Ok(*candle),
            Self::Kline(fields) => parse_kline(fields),
        }
    }
}

impl From<CandlePoint> for CandleInput {
    fn from(candle: CandlePoint) -> Self {
        Self::Point(candle)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub candles: Vec<CandleInput>,
    #[serde(default)]
    pub sentiment: Option<Vec<SentimentPoint>>,
    #[serde(default = "default_symbol")]
    pub symbol: String,
}

impl PredictionRequest {
    pub fn new(candles: Vec<CandlePoint>, sentiment: Option<Vec<SentimentPoint>>) -> Self {
        Self {
            candles: candles.into_iter().map(CandleInput::from).collect(),
            sentiment,
            symbol: default_symbol(),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_close: f64,
    pub confidence_score: f64,
    pub model_version: String,
    pub features_used: Vec<String>,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_trained: bool,
    pub version: String,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Request-level wrapper around a shared predictor.
///
/// Checks request size, runs the predictor off the async executor and shapes
/// the response.
#[derive(Clone)]
pub struct PredictionService {
    predictor: Arc<PricePredictor>,
    settings: ServiceEnvConfig,
    metrics: Option<Metrics>,
}

impl PredictionService {
    pub fn new(predictor: Arc<PricePredictor>, settings: ServiceEnvConfig) -> Self {
        Self {
            predictor,
            settings,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn predict(
        &self,
        request: PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        let _latency = self
            .metrics
            .as_ref()
            .map(|m| LatencyGuard::new(m.prediction_latency_seconds.clone()));

        let symbol = request.symbol.clone();
        let result = self.run(request).await;
        match &result {
            Ok(response) => {
                info!(
                    "Prediction for {}: close={} confidence={}",
                    symbol, response.predicted_close, response.confidence_score
                );
                if let Some(metrics) = &self.metrics {
                    metrics.inc_predictions("ok");
                    metrics.last_confidence.set(response.confidence_score);
                }
            }
            Err(e) => {
                warn!("Prediction for {} failed: {}", symbol, e);
                if let Some(metrics) = &self.metrics {
                    metrics.inc_predictions(e.kind());
                }
            }
        }
        result
    }

    async fn run(&self, request: PredictionRequest) -> Result<PredictionResponse, PredictionError> {
        let candles = request
            .candles
            .iter()
            .map(CandleInput::to_candle)
            .collect::<Result<Vec<_>, _>>()?;

        if candles.len() < self.settings.min_candles {
            return Err(PredictionError::InsufficientHistory {
                required: self.settings.min_candles,
                available: candles.len(),
            });
        }
        if candles.len() > self.settings.max_candles {
            return Err(PredictionError::TooManyCandles {
                limit: self.settings.max_candles,
                available: candles.len(),
            });
        }

        let predictor = Arc::clone(&self.predictor);
        let sentiment = request.sentiment;
        let prediction = tokio::task::spawn_blocking(move || {
            predictor.predict(&candles, sentiment.as_deref())
        })
        .await
        .map_err(|e| PredictionError::InferenceFailure {
            reason: format!("prediction task failed: {}", e),
        })??;

        if let (Some(samples), Some(metrics)) = (prediction.trained_samples, &self.metrics) {
            metrics.record_training();
            info!("Trained on request for {} ({} samples)", request.symbol, samples);
        }

        Ok(self.shape(prediction, request.symbol))
    }

    fn shape(&self, prediction: Prediction, symbol: String) -> PredictionResponse {
        let mut features_used = prediction.features_used;
        features_used.truncate(self.settings.features_display_limit);
        PredictionResponse {
            predicted_close: round4(prediction.predicted_close),
            confidence_score: round4(prediction.confidence),
            model_version: self.settings.model_version.clone(),
            features_used,
            symbol,
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            model_trained: self.predictor.is_trained(),
            version: self.settings.model_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RegressionModel;

    /// Predicts the mean of the training targets.
    struct MeanModel {
        mean: Option<f64>,
    }

    impl RegressionModel for MeanModel {
        fn fit(&mut self, _inputs: &[Vec<f64>], targets: &[f64]) -> Result<(), PredictionError> {
            self.mean = Some(targets.iter().sum::<f64>() / targets.len() as f64);
            Ok(())
        }

        fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
            let mean = self.mean.ok_or_else(|| PredictionError::InferenceFailure {
                reason: "unfitted".to_string(),
            })?;
            Ok(vec![mean; inputs.len()])
        }

        fn name(&self) -> &str {
            "mean"
        }
    }

    fn service() -> PredictionService {
        let predictor = PricePredictor::new(20, Box::new(MeanModel { mean: None }));
        PredictionService::new(Arc::new(predictor), ServiceEnvConfig::default())
    }

    fn candles(n: usize) -> Vec<CandlePoint> {
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.7).sin() * 3.0 + i as f64 * 0.05;
                CandlePoint::new(
                    i as i64 * 3_600_000,
                    close - 0.2,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1_000.0 + (i % 7) as f64 * 50.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.234_56), 1.2346);
        assert_eq!(round4(0.95), 0.95);
    }

    #[test]
    fn test_request_accepts_objects_and_klines() {
        let json = r#"{
            "candles": [
                {"timestamp": 1000, "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 10},
                {"openTime": 2000, "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 10},
                [3000, "1.0", "2.0", "0.5", "1.5", "10.0", 3999, "15.0", 5]
            ]
        }"#;
        let request: PredictionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.symbol, "UNKNOWN");
        assert!(request.sentiment.is_none());
        let parsed: Vec<CandlePoint> = request
            .candles
            .iter()
            .map(|c| c.to_candle().unwrap())
            .collect();
        assert_eq!(
            parsed.iter().map(|c| c.timestamp).collect::<Vec<_>>(),
            vec![1000, 2000, 3000]
        );
        assert_eq!(parsed[2].close, 1.5);
    }

    #[tokio::test]
    async fn test_too_few_candles_rejected_before_training() {
        let service = service();
        let err = service
            .predict(PredictionRequest::new(candles(99), None))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PredictionError::InsufficientHistory {
                required: 100,
                available: 99,
            }
        );
        assert!(!service.health().model_trained);
    }

    #[tokio::test]
    async fn test_too_many_candles_rejected() {
        let err = service()
            .predict(PredictionRequest::new(candles(1001), None))
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::TooManyCandles { limit: 1000, .. }));
    }

    #[tokio::test]
    async fn test_response_shape() {
        let metrics = Metrics::new().unwrap();
        let service = service().with_metrics(metrics.clone());
        let response = service
            .predict(PredictionRequest::new(candles(150), None).with_symbol("BTCUSDT"))
            .await
            .unwrap();

        assert_eq!(response.symbol, "BTCUSDT");
        assert_eq!(response.model_version, "1.0.0");
        assert_eq!(response.features_used.len(), 10);
        assert_eq!(response.features_used[0], "price_change_lag_0");
        assert_eq!(response.predicted_close, round4(response.predicted_close));
        assert!((0.1..=0.95).contains(&response.confidence_score));

        let health = service.health();
        assert_eq!(health.status, "healthy");
        assert!(health.model_trained);
        assert_eq!(metrics.training_runs_total.get(), 1);
        assert_eq!(metrics.predictions_with_outcome("ok"), 1.0);
    }
}
