use crate::domain::market::candle::SentimentPoint;
use crate::domain::ml::feature_row::{FeatureRow, IndicatorRow, SentimentFeatures};
use std::collections::HashMap;
use tracing::debug;

/// Merges a sparse sentiment series onto the candle timeline.
///
/// Observations are joined by exact timestamp, carried forward to later rows
/// without one, and rows before the first observation get zeros. With no
/// sentiment at all every row gets zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAligner;

impl SentimentAligner {
    pub fn new() -> Self {
        Self
    }

    /// `rows` must be in ascending timestamp order.
    pub fn align(
        &self,
        rows: &[IndicatorRow],
        sentiment: Option<&[SentimentPoint]>,
    ) -> Vec<FeatureRow> {
        let points = match sentiment {
            Some(points) if !points.is_empty() => points,
            _ => {
                return rows
                    .iter()
                    .map(|row| with_sentiment(row, SentimentFeatures::default()))
                    .collect();
            }
        };

        // Later observations for the same timestamp replace earlier ones
        let by_timestamp: HashMap<i64, SentimentFeatures> = points
            .iter()
            .map(|p| {
                (
                    p.timestamp,
                    SentimentFeatures {
                        sentiment_score: p.sentiment_score,
                        news_count: f64::from(p.news_count),
                        social_mentions: f64::from(p.social_mentions),
                    },
                )
            })
            .collect();

        let mut matched = 0usize;
        let mut carried: Option<SentimentFeatures> = None;
        let aligned = rows
            .iter()
            .map(|row| {
                if let Some(observed) = by_timestamp.get(&row.candle.timestamp) {
                    matched += 1;
                    carried = Some(*observed);
                }
                with_sentiment(row, carried.unwrap_or_default())
            })
            .collect();

        debug!(
            "Aligned {} sentiment points onto {} candles ({} exact matches)",
            points.len(),
            rows.len(),
            matched
        );
        aligned
    }
}

fn with_sentiment(row: &IndicatorRow, sentiment: SentimentFeatures) -> FeatureRow {
    FeatureRow {
        candle: row.candle,
        indicators: row.indicators,
        sentiment,
    }
}
