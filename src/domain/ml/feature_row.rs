use super::feature_registry::{FEATURE_COUNT, Feature};
use crate::domain::market::candle::CandlePoint;

/// Maps an IEEE result to the defined/undefined tag.
///
/// NaN (0/0, anything touching an undefined input) is undefined. Infinities
/// are kept as defined values.
#[inline]
pub fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

/// Rolling indicators for one candle. `None` marks warm-up or a 0/0 result.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Indicators {
    pub price_change: Option<f64>,
    pub high_low_pct: Option<f64>,
    pub open_close_pct: Option<f64>,
    pub sma_5: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_std: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_position: Option<f64>,
    pub volume_sma: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub volatility: Option<f64>,
    pub high_20: Option<f64>,
    pub low_20: Option<f64>,
    pub price_position: Option<f64>,
}

/// A candle annotated with its indicators, before sentiment alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub candle: CandlePoint,
    pub indicators: Indicators,
}

/// Sentiment columns after alignment. Always defined (zero when unknown).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SentimentFeatures {
    pub sentiment_score: f64,
    pub news_count: f64,
    pub social_mentions: f64,
}

/// A fully assembled row: raw candle, indicators and aligned sentiment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub candle: CandlePoint,
    pub indicators: Indicators,
    pub sentiment: SentimentFeatures,
}

impl FeatureRow {
    pub fn value(&self, feature: Feature) -> Option<f64> {
        let ind = &self.indicators;
        match feature {
            Feature::PriceChange => ind.price_change,
            Feature::HighLowPct => ind.high_low_pct,
            Feature::OpenClosePct => ind.open_close_pct,
            Feature::Sma5 => ind.sma_5,
            Feature::Sma10 => ind.sma_10,
            Feature::Sma20 => ind.sma_20,
            Feature::Sma50 => ind.sma_50,
            Feature::Rsi => ind.rsi,
            Feature::BbPosition => ind.bb_position,
            Feature::VolumeRatio => ind.volume_ratio,
            Feature::Volatility => ind.volatility,
            Feature::PricePosition => ind.price_position,
            Feature::SentimentScore => Some(self.sentiment.sentiment_score),
            Feature::NewsCount => Some(self.sentiment.news_count),
            Feature::SocialMentions => Some(self.sentiment.social_mentions),
        }
    }

    /// Returns the row with every feature unwrapped, or `None` if any is undefined.
    pub fn to_clean(&self) -> Option<CleanRow> {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = self.value(feature)?;
        }
        Some(CleanRow {
            timestamp: self.candle.timestamp,
            close: self.candle.close,
            values,
        })
    }
}

/// A row whose fifteen features are all defined, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanRow {
    pub timestamp: i64,
    pub close: f64,
    pub values: [f64; FEATURE_COUNT],
}

impl CleanRow {
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }
}
