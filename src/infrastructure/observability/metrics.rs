//! Prometheus metrics definitions for the prediction service
//!
//! All metrics use the `pricecast_` prefix.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the predictor
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Predictions served, labelled by outcome (`ok` or the error kind)
    pub predictions_total: CounterVec,
    /// Completed one-time model fits
    pub training_runs_total: IntCounter,
    /// End-to-end prediction latency in seconds
    pub prediction_latency_seconds: Histogram,
    /// 1 once the model has been fitted
    pub model_trained: GenericGauge<AtomicF64>,
    /// Confidence score of the most recent successful prediction
    pub last_confidence: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new("pricecast_predictions_total", "Predictions served by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let training_runs_total = IntCounter::with_opts(Opts::new(
            "pricecast_training_runs_total",
            "Completed model fits",
        ))?;
        registry.register(Box::new(training_runs_total.clone()))?;

        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "pricecast_prediction_latency_seconds",
                "Prediction latency in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0,
            ]),
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let model_trained = Gauge::with_opts(Opts::new(
            "pricecast_model_trained",
            "Model fitted status (0=untrained, 1=trained)",
        ))?;
        registry.register(Box::new(model_trained.clone()))?;

        let last_confidence = Gauge::with_opts(Opts::new(
            "pricecast_last_confidence",
            "Confidence score of the latest prediction",
        ))?;
        registry.register(Box::new(last_confidence.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "pricecast_uptime_seconds",
            "Service uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            training_runs_total,
            prediction_latency_seconds,
            model_trained,
            last_confidence,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_predictions(&self, outcome: &str) {
        self.predictions_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_training(&self) {
        self.training_runs_total.inc();
        self.model_trained.set(1.0);
    }

    pub fn predictions_with_outcome(&self, outcome: &str) -> f64 {
        self.predictions_total.with_label_values(&[outcome]).get()
    }
}
