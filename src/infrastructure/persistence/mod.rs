pub mod candle_csv;

pub use candle_csv::{load_candles, load_sentiment, read_candles, read_sentiment};
