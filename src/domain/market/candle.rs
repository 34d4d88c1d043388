use serde::{Deserialize, Serialize};

/// One OHLCV bar. `timestamp` is the bar's open time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    #[serde(alias = "openTime", alias = "open_time")]
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl CandlePoint {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// A discrete sentiment observation (news and social activity) at a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub timestamp: i64,
    /// Score in [-1, 1]
    pub sentiment_score: f64,
    #[serde(default)]
    pub news_count: u32,
    #[serde(default)]
    pub social_mentions: u32,
}

/// Returns a copy of `candles` ordered by ascending timestamp.
///
/// Stable, so re-sorting an already sorted series is a no-op.
pub fn sorted_by_time(candles: &[CandlePoint]) -> Vec<CandlePoint> {
    let mut sorted = candles.to_vec();
    sorted.sort_by_key(|c| c.timestamp);
    sorted
}
