use super::rolling::{rolling_max, rolling_mean, rolling_min, rolling_sample_std};
use crate::domain::market::candle::CandlePoint;
use crate::domain::ml::feature_row::{IndicatorRow, Indicators, defined};
use tracing::debug;

pub const SMA_WINDOWS: [usize; 4] = [5, 10, 20, 50];
pub const RSI_WINDOW: usize = 14;
pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;
pub const VOLUME_WINDOW: usize = 20;
pub const VOLATILITY_WINDOW: usize = 20;
pub const RANGE_WINDOW: usize = 20;

/// Computes causal rolling indicators over a candle series.
///
/// Input must already be sorted by ascending timestamp. Row `i` only uses
/// candles `0..=i`. Warm-up rows and 0/0 results are left undefined; an
/// undefined input makes every value derived from it undefined too.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, candles: &[CandlePoint]) -> Vec<IndicatorRow> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

        // Gain/loss at the first row is 0, so RSI warms up after RSI_WINDOW rows
        let mut gains = vec![0.0; closes.len()];
        let mut losses = vec![0.0; closes.len()];
        for i in 1..closes.len() {
            let delta = closes[i] - closes[i - 1];
            gains[i] = delta.max(0.0);
            losses[i] = (-delta).max(0.0);
        }

        let [sma_5, sma_10, sma_20, sma_50] = SMA_WINDOWS.map(|w| rolling_mean(&closes, w));
        let avg_gain = rolling_mean(&gains, RSI_WINDOW);
        let avg_loss = rolling_mean(&losses, RSI_WINDOW);
        let bb_middle = rolling_mean(&closes, BOLLINGER_WINDOW);
        let bb_std = rolling_sample_std(&closes, BOLLINGER_WINDOW);
        let volume_sma = rolling_mean(&volumes, VOLUME_WINDOW);
        let volatility = rolling_sample_std(&closes, VOLATILITY_WINDOW);
        let high_20 = rolling_max(&highs, RANGE_WINDOW);
        let low_20 = rolling_min(&lows, RANGE_WINDOW);

        let rows: Vec<IndicatorRow> = candles
            .iter()
            .enumerate()
            .map(|(i, candle)| {
                let close = candle.close;

                let price_change = (i > 0)
                    .then(|| close / closes[i - 1] - 1.0)
                    .and_then(defined);

                let rsi = avg_gain[i]
                    .zip(avg_loss[i])
                    .and_then(|(gain, loss)| defined(100.0 - 100.0 / (1.0 + gain / loss)));

                let bb_upper = bb_middle[i]
                    .zip(bb_std[i])
                    .map(|(m, s)| m + BOLLINGER_K * s);
                let bb_lower = bb_middle[i]
                    .zip(bb_std[i])
                    .map(|(m, s)| m - BOLLINGER_K * s);
                let bb_position = bb_upper
                    .zip(bb_lower)
                    .and_then(|(upper, lower)| defined((close - lower) / (upper - lower)));

                let volume_ratio = volume_sma[i].and_then(|avg| defined(candle.volume / avg));

                let price_position = high_20[i]
                    .zip(low_20[i])
                    .and_then(|(high, low)| defined((close - low) / (high - low)));

                IndicatorRow {
                    candle: *candle,
                    indicators: Indicators {
                        price_change,
                        high_low_pct: defined((candle.high - candle.low) / close),
                        open_close_pct: defined((close - candle.open) / candle.open),
                        sma_5: sma_5[i],
                        sma_10: sma_10[i],
                        sma_20: sma_20[i],
                        sma_50: sma_50[i],
                        rsi,
                        bb_middle: bb_middle[i],
                        bb_std: bb_std[i],
                        bb_upper,
                        bb_lower,
                        bb_position,
                        volume_sma: volume_sma[i],
                        volume_ratio,
                        volatility: volatility[i],
                        high_20: high_20[i],
                        low_20: low_20[i],
                        price_position,
                    },
                }
            })
            .collect();

        debug!("Computed indicators for {} candles", rows.len());
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> Vec<CandlePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| CandlePoint::new(i as i64 * 3600, c, c * 1.01, c * 0.99, c, 1000.0))
            .collect()
    }

    fn wavy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_sma_exact_at_first_full_window() {
        let closes = wavy(60);
        let rows = IndicatorEngine::new().compute(&series(&closes));

        for w in SMA_WINDOWS {
            let expected = closes[..w].iter().sum::<f64>() / w as f64;
            let at = |i: usize| match w {
                5 => rows[i].indicators.sma_5,
                10 => rows[i].indicators.sma_10,
                20 => rows[i].indicators.sma_20,
                _ => rows[i].indicators.sma_50,
            };
            assert_eq!(at(w - 1), Some(expected), "sma_{w}");
            if w > 1 {
                assert_eq!(at(w - 2), None, "sma_{w} warm-up");
            }
        }
    }

    #[test]
    fn test_price_change_undefined_at_first_row() {
        let rows = IndicatorEngine::new().compute(&series(&[100.0, 110.0]));
        assert_eq!(rows[0].indicators.price_change, None);
        let change = rows[1].indicators.price_change.expect("defined");
        assert!((change - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_candle_shape_features() {
        let candle = CandlePoint::new(0, 100.0, 110.0, 90.0, 105.0, 10.0);
        let rows = IndicatorEngine::new().compute(&[candle]);
        let ind = rows[0].indicators;
        assert_eq!(ind.high_low_pct, Some(20.0 / 105.0));
        assert_eq!(ind.open_close_pct, Some(0.05));
    }

    #[test]
    fn test_rsi_saturates_at_100_on_monotonic_rise() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let rows = IndicatorEngine::new().compute(&series(&closes));
        assert_eq!(rows[12].indicators.rsi, None);
        for row in &rows[13..] {
            assert_eq!(row.indicators.rsi, Some(100.0));
        }
    }

    #[test]
    fn test_rsi_undefined_on_flat_prices() {
        let rows = IndicatorEngine::new().compute(&series(&[100.0; 30]));
        assert!(rows.iter().all(|r| r.indicators.rsi.is_none()));
    }

    #[test]
    fn test_rsi_bounded() {
        let rows = IndicatorEngine::new().compute(&series(&wavy(120)));
        for rsi in rows.iter().filter_map(|r| r.indicators.rsi) {
            assert!((0.0..=100.0).contains(&rsi), "rsi out of range: {rsi}");
        }
    }

    #[test]
    fn test_bollinger_width_is_four_std() {
        let rows = IndicatorEngine::new().compute(&series(&wavy(80)));
        let mut checked = 0;
        for row in &rows {
            let ind = row.indicators;
            if let (Some(upper), Some(lower), Some(std)) = (ind.bb_upper, ind.bb_lower, ind.bb_std) {
                assert!((upper - lower - 4.0 * std).abs() < 1e-9);
                checked += 1;
            }
        }
        assert_eq!(checked, 80 - BOLLINGER_WINDOW + 1);
    }

    #[test]
    fn test_flat_run_leaves_band_and_range_features_undefined() {
        let candles: Vec<CandlePoint> = (0..25)
            .map(|i| CandlePoint::new(i, 50.0, 50.0, 50.0, 50.0, 0.0))
            .collect();
        let rows = IndicatorEngine::new().compute(&candles);
        let last = rows[24].indicators;
        assert_eq!(last.volatility, Some(0.0));
        assert_eq!(last.bb_position, None);
        assert_eq!(last.price_position, None);
        // 0 volume over a 0 mean is 0/0
        assert_eq!(last.volume_ratio, None);
    }

    #[test]
    fn test_volume_ratio_against_trailing_mean() {
        let mut candles: Vec<CandlePoint> = (0..20)
            .map(|i| CandlePoint::new(i, 50.0, 51.0, 49.0, 50.0, 0.0))
            .collect();
        candles[19].volume = 20.0;
        let rows = IndicatorEngine::new().compute(&candles);
        assert_eq!(rows[19].indicators.volume_sma, Some(1.0));
        assert_eq!(rows[19].indicators.volume_ratio, Some(20.0));
    }

    #[test]
    fn test_price_position_uses_high_low_range() {
        let closes = wavy(30);
        let rows = IndicatorEngine::new().compute(&series(&closes));
        let ind = rows[29].indicators;
        let (high, low) = (ind.high_20.unwrap(), ind.low_20.unwrap());
        let expected = (closes[29] - low) / (high - low);
        assert_eq!(ind.price_position, Some(expected));
        assert!(ind.price_position.unwrap() > 0.0 && ind.price_position.unwrap() < 1.0);
    }
}
