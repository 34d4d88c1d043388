use std::fmt;

/// The fifteen model input features.
///
/// The declaration order is the canonical order used to flatten every
/// training and inference window. Any change here is a breaking change for
/// fitted models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    PriceChange,
    HighLowPct,
    OpenClosePct,
    Sma5,
    Sma10,
    Sma20,
    Sma50,
    Rsi,
    BbPosition,
    VolumeRatio,
    Volatility,
    PricePosition,
    SentimentScore,
    NewsCount,
    SocialMentions,
}

pub const FEATURE_COUNT: usize = 15;

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::PriceChange,
        Feature::HighLowPct,
        Feature::OpenClosePct,
        Feature::Sma5,
        Feature::Sma10,
        Feature::Sma20,
        Feature::Sma50,
        Feature::Rsi,
        Feature::BbPosition,
        Feature::VolumeRatio,
        Feature::Volatility,
        Feature::PricePosition,
        Feature::SentimentScore,
        Feature::NewsCount,
        Feature::SocialMentions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::PriceChange => "price_change",
            Feature::HighLowPct => "high_low_pct",
            Feature::OpenClosePct => "open_close_pct",
            Feature::Sma5 => "sma_5",
            Feature::Sma10 => "sma_10",
            Feature::Sma20 => "sma_20",
            Feature::Sma50 => "sma_50",
            Feature::Rsi => "rsi",
            Feature::BbPosition => "bb_position",
            Feature::VolumeRatio => "volume_ratio",
            Feature::Volatility => "volatility",
            Feature::PricePosition => "price_position",
            Feature::SentimentScore => "sentiment_score",
            Feature::NewsCount => "news_count",
            Feature::SocialMentions => "social_mentions",
        }
    }

    /// Position of this feature in [`Feature::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical feature names, in flattening order.
pub fn feature_names() -> Vec<String> {
    Feature::ALL.iter().map(|f| f.name().to_string()).collect()
}

/// Names of every slot in a flattened window: grouped by feature, then by lag.
///
/// The order matches `Sequence::inputs` element for element.
pub fn lagged_feature_names(names: &[String], sequence_length: usize) -> Vec<String> {
    names
        .iter()
        .flat_map(|name| (0..sequence_length).map(move |lag| format!("{name}_lag_{lag}")))
        .collect()
}
