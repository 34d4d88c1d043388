use crate::domain::errors::PredictionError;
use serde::{Deserialize, Serialize};

/// Per-column min–max normalizer.
///
/// Fitted once; later inputs outside the fitted range are not clamped and may
/// land outside [0, 1]. Columns that were constant at fit time keep a unit
/// range, so they map to `x - min`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    mins: Vec<f64>,
    ranges: Vec<f64>,
}

impl MinMaxScaler {
    pub fn fit(inputs: &[Vec<f64>]) -> Result<Self, PredictionError> {
        let width = match inputs.first() {
            Some(row) => row.len(),
            None => {
                return Err(PredictionError::TrainingFailure {
                    reason: "cannot fit scaler on an empty matrix".to_string(),
                });
            }
        };

        let mut mins = vec![f64::INFINITY; width];
        let mut maxs = vec![f64::NEG_INFINITY; width];
        for (r, row) in inputs.iter().enumerate() {
            if row.len() != width {
                return Err(PredictionError::TrainingFailure {
                    reason: format!("row {r} has {} columns, expected {width}", row.len()),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(PredictionError::TrainingFailure {
                        reason: format!("input contains non-finite value at row {r}, column {c}"),
                    });
                }
                mins[c] = mins[c].min(value);
                maxs[c] = maxs[c].max(value);
            }
        }

        let ranges = mins
            .iter()
            .zip(&maxs)
            .map(|(min, max)| {
                let range = max - min;
                if range == 0.0 { 1.0 } else { range }
            })
            .collect();

        Ok(Self { mins, ranges })
    }

    pub fn width(&self) -> usize {
        self.mins.len()
    }

    pub fn transform(&self, inputs: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PredictionError> {
        inputs
            .iter()
            .map(|row| {
                if row.len() != self.width() {
                    return Err(PredictionError::InferenceFailure {
                        reason: format!(
                            "input has {} columns, scaler was fitted on {}",
                            row.len(),
                            self.width()
                        ),
                    });
                }
                Ok(row
                    .iter()
                    .zip(self.mins.iter().zip(&self.ranges))
                    .map(|(value, (min, range))| (value - min) / range)
                    .collect())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform_unit_range() {
        let inputs = vec![vec![0.0, 10.0], vec![5.0, 20.0], vec![10.0, 30.0]];
        let scaler = MinMaxScaler::fit(&inputs).unwrap();
        let scaled = scaler.transform(&inputs).unwrap();
        assert_eq!(scaled[0], vec![0.0, 0.0]);
        assert_eq!(scaled[1], vec![0.5, 0.5]);
        assert_eq!(scaled[2], vec![1.0, 1.0]);
    }

    #[test]
    fn test_stale_range_is_not_clamped() {
        let scaler = MinMaxScaler::fit(&[vec![0.0], vec![10.0]]).unwrap();
        let scaled = scaler.transform(&[vec![20.0], vec![-5.0]]).unwrap();
        assert_eq!(scaled[0][0], 2.0);
        assert_eq!(scaled[1][0], -0.5);
    }

    #[test]
    fn test_constant_column_maps_to_offset() {
        let scaler = MinMaxScaler::fit(&[vec![3.0], vec![3.0]]).unwrap();
        assert_eq!(scaler.transform(&[vec![3.0]]).unwrap()[0][0], 0.0);
        assert_eq!(scaler.transform(&[vec![4.5]]).unwrap()[0][0], 1.5);
    }

    #[test]
    fn test_fit_rejects_empty_and_ragged() {
        assert!(matches!(
            MinMaxScaler::fit(&[]),
            Err(PredictionError::TrainingFailure { .. })
        ));
        assert!(MinMaxScaler::fit(&[vec![1.0, 2.0], vec![1.0]]).is_err());
        assert!(MinMaxScaler::fit(&[vec![f64::INFINITY]]).is_err());
    }

    #[test]
    fn test_transform_width_mismatch() {
        let scaler = MinMaxScaler::fit(&[vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            scaler.transform(&[vec![1.0]]),
            Err(PredictionError::InferenceFailure { .. })
        ));
    }
}
