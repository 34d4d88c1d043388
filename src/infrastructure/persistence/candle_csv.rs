//! CSV loaders for candle and sentiment histories
//!
//! Candle files need the header `timestamp,open,high,low,close,volume`
//! (`open_time` is accepted for the first column). Sentiment files need
//! `timestamp,sentiment_score` and may add `news_count,social_mentions`.

use crate::domain::market::{CandlePoint, SentimentPoint};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let record: T = result.with_context(|| format!("Failed to parse record {}", line + 1))?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_candles<R: Read>(reader: R) -> Result<Vec<CandlePoint>> {
    read_records(reader)
}

pub fn read_sentiment<R: Read>(reader: R) -> Result<Vec<SentimentPoint>> {
    read_records(reader)
}

pub fn load_candles<P: AsRef<Path>>(path: P) -> Result<Vec<CandlePoint>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open candle file: {:?}", path.as_ref()))?;
    let candles = read_candles(BufReader::new(file))?;
    info!("Loaded {} candles from {:?}", candles.len(), path.as_ref());
    Ok(candles)
}

pub fn load_sentiment<P: AsRef<Path>>(path: P) -> Result<Vec<SentimentPoint>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open sentiment file: {:?}", path.as_ref()))?;
    let points = read_sentiment(BufReader::new(file))?;
    info!("Loaded {} sentiment points from {:?}", points.len(), path.as_ref());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_candles() {
        let data = "timestamp,open,high,low,close,volume\n\
                    1000,1.0,2.0,0.5,1.5,100\n\
                    2000,1.5,2.5,1.0,2.0,120\n";
        let candles = read_candles(data.as_bytes()).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[1].timestamp, 2000);
        assert_eq!(candles[1].close, 2.0);
    }

    #[test]
    fn test_read_sentiment_with_optional_counts() {
        let data = "timestamp,sentiment_score\n1000,0.25\n";
        let points = read_sentiment(data.as_bytes()).unwrap();
        assert_eq!(points[0].sentiment_score, 0.25);
        assert_eq!(points[0].news_count, 0);
    }

    #[test]
    fn test_malformed_row_reports_record() {
        let data = "timestamp,open,high,low,close,volume\n1000,x,2,1,1,1\n";
        let err = read_candles(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_candles("/nonexistent/candles.csv").is_err());
    }
}
