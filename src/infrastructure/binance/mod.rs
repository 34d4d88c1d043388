pub mod klines;

pub use klines::parse_kline;
