//! Push-based metrics reporter
//!
//! Periodically outputs a metrics snapshot as structured JSON to stdout, and
//! the Prometheus text exposition at debug level.

use crate::application::ml::PricePredictor;
use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Metrics snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model: ModelSnapshot,
    pub predictions: PredictionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ModelSnapshot {
    pub name: String,
    pub trained: bool,
    pub sequence_length: usize,
    pub training_runs: u64,
}

#[derive(Debug, Serialize)]
pub struct PredictionSnapshot {
    pub succeeded: u64,
    pub latency_samples: u64,
    pub mean_latency_seconds: f64,
    pub last_confidence: f64,
}

/// Outputs metrics as structured JSON logs on a fixed interval.
pub struct MetricsReporter {
    predictor: Arc<PricePredictor>,
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(predictor: Arc<PricePredictor>, metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            predictor,
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Prefixed so log shippers can filter it
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Model trained: {} | Predictions: {} | Uptime: {}s",
                        snapshot.model.trained,
                        snapshot.predictions.succeeded,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
            debug!("Prometheus exposition:\n{}", self.metrics.render());
        }
    }

    fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        let trained = self.predictor.is_trained();

        self.metrics.uptime_seconds.set(uptime as f64);
        self.metrics
            .model_trained
            .set(if trained { 1.0 } else { 0.0 });

        let latency = &self.metrics.prediction_latency_seconds;
        let samples = latency.get_sample_count();
        let mean_latency_seconds = if samples == 0 {
            0.0
        } else {
            latency.get_sample_sum() / samples as f64
        };

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: ModelSnapshot {
                name: self.predictor.model_name(),
                trained,
                sequence_length: self.predictor.sequence_length(),
                training_runs: self.metrics.training_runs_total.get(),
            },
            predictions: PredictionSnapshot {
                succeeded: self.metrics.predictions_with_outcome("ok") as u64,
                latency_samples: samples,
                mean_latency_seconds,
                last_confidence: self.metrics.last_confidence.get(),
            },
        }
    }
}
