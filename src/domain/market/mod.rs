pub mod candle;

pub use candle::{CandlePoint, SentimentPoint, sorted_by_time};
