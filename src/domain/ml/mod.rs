pub mod feature_registry;
pub mod feature_row;
pub mod sequence;

pub use feature_registry::{FEATURE_COUNT, Feature, feature_names, lagged_feature_names};
pub use feature_row::{
    CleanRow, FeatureRow, IndicatorRow, Indicators, SentimentFeatures, defined,
};
pub use sequence::{Sequence, SequenceSet};
