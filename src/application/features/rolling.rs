//! Trailing-window statistics over a column of values.
//!
//! Every function returns one entry per input row. Row `i` only looks at
//! rows `i + 1 - window ..= i` and is `None` until a full window exists.

use statrs::statistics::{Data, Distribution};

/// The `window` values ending at row `end`, or `None` during warm-up.
pub fn trailing_window(values: &[f64], end: usize, window: usize) -> Option<&[f64]> {
    if window == 0 || end >= values.len() || end + 1 < window {
        return None;
    }
    Some(&values[end + 1 - window..=end])
}

fn rolling<F>(values: &[f64], window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    (0..values.len())
        .map(|i| trailing_window(values, i, window).and_then(&stat))
        .collect()
}

/// Arithmetic mean of each trailing window.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        (!mean.is_nan()).then_some(mean)
    })
}

/// Sample (n - 1) standard deviation of each trailing window.
pub fn rolling_sample_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        if w.len() < 2 {
            return None;
        }
        Data::new(w.to_vec()).std_dev().filter(|s| !s.is_nan())
    })
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        Some(w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    })
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        Some(w.iter().copied().fold(f64::INFINITY, f64::min))
    })
}
