// Rolling window statistics
pub mod rolling;

pub mod indicator_engine;
pub mod sentiment_aligner;

pub use indicator_engine::IndicatorEngine;
pub use sentiment_aligner::SentimentAligner;
