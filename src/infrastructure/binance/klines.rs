//! Binance kline arrays
//!
//! Klines arrive as `[open_time, open, high, low, close, volume, close_time, ...]`
//! with prices encoded as strings. Plain numbers are accepted too.

use crate::domain::errors::PredictionError;
use crate::domain::market::CandlePoint;
use serde_json::Value;

const KLINE_MIN_FIELDS: usize = 6;

pub fn parse_kline(fields: &[Value]) -> Result<CandlePoint, PredictionError> {
    if fields.len() < KLINE_MIN_FIELDS {
        return Err(PredictionError::InvalidCandle {
            timestamp: fields.first().and_then(Value::as_i64).unwrap_or_default(),
            reason: format!(
                "kline has {} fields, expected at least {}",
                fields.len(),
                KLINE_MIN_FIELDS
            ),
        });
    }

    let timestamp = fields[0]
        .as_i64()
        .or_else(|| fields[0].as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| PredictionError::InvalidCandle {
            timestamp: 0,
            reason: format!("kline open time is not an integer: {}", fields[0]),
        })?;

    let number = |index: usize, name: &str| -> Result<f64, PredictionError> {
        let value = &fields[index];
        value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.parse::<f64>().ok()))
            .ok_or_else(|| PredictionError::InvalidCandle {
                timestamp,
                reason: format!("kline {} is not numeric: {}", name, value),
            })
    };

    Ok(CandlePoint::new(
        timestamp,
        number(1, "open")?,
        number(2, "high")?,
        number(3, "low")?,
        number(4, "close")?,
        number(5, "volume")?,
    ))
}
