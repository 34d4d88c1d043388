#![allow(dead_code)]

use pricecast::domain::errors::PredictionError;
use pricecast::domain::market::{CandlePoint, SentimentPoint};
use pricecast::domain::ports::RegressionModel;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const HOUR_MS: i64 = 3_600_000;
/// Rows before every indicator is defined (SMA-50 is the slowest).
pub const WARMUP_ROWS: usize = 49;

/// Hourly candles whose close rises by `step` every bar.
pub fn rising_candles(n: usize, step: f64) -> Vec<CandlePoint> {
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64 * step;
            CandlePoint::new(
                i as i64 * HOUR_MS,
                close - step / 2.0,
                close + 0.5,
                close - 0.5,
                close,
                1_000.0,
            )
        })
        .collect()
}

/// Hourly candles with an oscillating close and varying volume.
pub fn wavy_candles(n: usize) -> Vec<CandlePoint> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + (t * 0.3).sin() * 4.0 + t * 0.02;
            CandlePoint::new(
                i as i64 * HOUR_MS,
                close - 0.3,
                close + 1.2,
                close - 1.1,
                close,
                1_000.0 + ((i * 37) % 11) as f64 * 40.0,
            )
        })
        .collect()
}

pub fn sentiment_at(timestamp: i64, score: f64, news: u32, social: u32) -> SentimentPoint {
    SentimentPoint {
        timestamp,
        sentiment_score: score,
        news_count: news,
        social_mentions: social,
    }
}

/// Predicts the mean training target plus the first scaled input, and
/// counts fits. Can be told to fail its first `failures` fits and to
/// sleep while fitting.
pub struct CountingModel {
    pub fits: Arc<AtomicUsize>,
    failures: usize,
    fit_delay: Duration,
    mean: Option<f64>,
}

impl CountingModel {
    pub fn new(fits: Arc<AtomicUsize>) -> Self {
        Self {
            fits,
            failures: 0,
            fit_delay: Duration::ZERO,
            mean: None,
        }
    }

    pub fn failing_first(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    pub fn with_fit_delay(mut self, delay: Duration) -> Self {
        self.fit_delay = delay;
        self
    }
}

impl RegressionModel for CountingModel {
    fn fit(&mut self, _inputs: &[Vec<f64>], targets: &[f64]) -> Result<(), PredictionError> {
        std::thread::sleep(self.fit_delay);
        let attempt = self.fits.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(PredictionError::TrainingFailure {
                reason: format!("planned failure {}", attempt + 1),
            });
        }
        self.mean = Some(targets.iter().sum::<f64>() / targets.len() as f64);
        Ok(())
    }

    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
        let mean = self.mean.ok_or_else(|| PredictionError::InferenceFailure {
            reason: "not fitted".to_string(),
        })?;
        Ok(inputs.iter().map(|row| mean + row[0]).collect())
    }

    fn name(&self) -> &str {
        "counting"
    }
}
