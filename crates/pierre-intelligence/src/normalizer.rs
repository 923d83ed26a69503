// ABOUTME: Min-max normalization of model features and labels into [0, 1]
// ABOUTME: NormalizationBounds derived from a training set, with degenerate-range handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Min-max normalization.
//!
//! Everything here is a pure function of its inputs, so it is safe to call
//! from any thread. A degenerate range (`max <= min`) cannot be scaled; the
//! value passes through unchanged and a warning is logged instead of
//! producing `NaN`.

use pierre_core::constants::dataset::FEATURE_COUNT;
use pierre_core::errors::RecommendationError;
use pierre_core::models::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Scale a vector component-wise: `(x - min) / (max - min)`
#[must_use]
pub fn normalize<const N: usize>(vector: &[f64; N], min: &[f64; N], max: &[f64; N]) -> [f64; N] {
    let mut scaled = *vector;
    for (i, value) in scaled.iter_mut().enumerate() {
        match scale(*value, min[i], max[i]) {
            Some(v) => *value = v,
            None => warn!(
                feature = i,
                min = min[i],
                max = max[i],
                "degenerate normalization range, passing value through"
            ),
        }
    }
    scaled
}

/// Inverse of [`normalize`]: `x' * (max - min) + min`
#[must_use]
pub fn denormalize<const N: usize>(vector: &[f64; N], min: &[f64; N], max: &[f64; N]) -> [f64; N] {
    let mut restored = *vector;
    for (i, value) in restored.iter_mut().enumerate() {
        match unscale(*value, min[i], max[i]) {
            Some(v) => *value = v,
            None => warn!(
                feature = i,
                min = min[i],
                max = max[i],
                "degenerate normalization range, passing value through"
            ),
        }
    }
    restored
}

fn scale(value: f64, min: f64, max: f64) -> Option<f64> {
    is_usable_range(min, max).then(|| (value - min) / (max - min))
}

fn unscale(value: f64, min: f64, max: f64) -> Option<f64> {
    is_usable_range(min, max).then(|| value.mul_add(max - min, min))
}

fn is_usable_range(min: f64, max: f64) -> bool {
    min.is_finite() && max.is_finite() && max > min
}

/// Per-feature and label bounds computed from one training set.
///
/// The bounds belong to the model trained on the same set and are persisted
/// and loaded together with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationBounds {
    /// Per-feature minimum
    pub input_min: [f64; FEATURE_COUNT],
    /// Per-feature maximum
    pub input_max: [f64; FEATURE_COUNT],
    /// Label minimum
    pub output_min: f64,
    /// Label maximum
    pub output_max: f64,
}

impl NormalizationBounds {
    /// Compute bounds over a full dataset
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if the dataset is empty or the columns
    /// differ in length
    pub fn from_dataset(
        inputs: &[FeatureVector],
        outputs: &[f64],
    ) -> Result<Self, RecommendationError> {
        if inputs.is_empty() || outputs.is_empty() || inputs.len() != outputs.len() {
            return Err(RecommendationError::InsufficientData {
                available: inputs.len().min(outputs.len()),
                required: 1,
            });
        }

        let mut input_min = [f64::INFINITY; FEATURE_COUNT];
        let mut input_max = [f64::NEG_INFINITY; FEATURE_COUNT];
        for row in inputs {
            for (i, value) in row.0.iter().enumerate() {
                input_min[i] = input_min[i].min(*value);
                input_max[i] = input_max[i].max(*value);
            }
        }
        let output_min = outputs.iter().copied().fold(f64::INFINITY, f64::min);
        let output_max = outputs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            input_min,
            input_max,
            output_min,
            output_max,
        })
    }

    /// Indices of features whose range cannot be scaled
    #[must_use]
    pub fn degenerate_features(&self) -> Vec<usize> {
        (0..FEATURE_COUNT)
            .filter(|&i| !is_usable_range(self.input_min[i], self.input_max[i]))
            .collect()
    }

    /// Check that loaded bounds are finite and ordered
    ///
    /// # Errors
    ///
    /// Returns `ModelLoad` describing the first malformed entry
    pub fn validate(&self) -> Result<(), RecommendationError> {
        let inputs_ok = self
            .input_min
            .iter()
            .zip(&self.input_max)
            .all(|(min, max)| min.is_finite() && max.is_finite() && max >= min);
        if !inputs_ok {
            return Err(RecommendationError::ModelLoad {
                reason: "input bounds are not finite and ordered".to_owned(),
            });
        }
        if !(self.output_min.is_finite()
            && self.output_max.is_finite()
            && self.output_max >= self.output_min)
        {
            return Err(RecommendationError::ModelLoad {
                reason: "output bounds are not finite and ordered".to_owned(),
            });
        }
        Ok(())
    }

    /// Scale one feature vector
    #[must_use]
    pub fn normalize_features(&self, features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        normalize(&features.0, &self.input_min, &self.input_max)
    }

    /// Scale a whole dataset, warning once per degenerate feature instead of once per row
    #[must_use]
    pub fn normalize_dataset(&self, inputs: &[FeatureVector]) -> Vec<[f64; FEATURE_COUNT]> {
        for feature in self.degenerate_features() {
            warn!(
                feature,
                value = self.input_min[feature],
                "feature is constant across the training set, passing it through unscaled"
            );
        }
        inputs
            .iter()
            .map(|row| {
                let mut scaled = row.0;
                for (i, value) in scaled.iter_mut().enumerate() {
                    if let Some(v) = scale(*value, self.input_min[i], self.input_max[i]) {
                        *value = v;
                    }
                }
                scaled
            })
            .collect()
    }

    /// Scale one label
    #[must_use]
    pub fn normalize_label(&self, calories: f64) -> f64 {
        normalize(&[calories], &[self.output_min], &[self.output_max])[0]
    }

    /// Restore a model output to calories
    #[must_use]
    pub fn denormalize_label(&self, scaled: f64) -> f64 {
        denormalize(&[scaled], &[self.output_min], &[self.output_max])[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_within_bounds() {
        let min = [0.0, 150.0, -5.0];
        let max = [10.0, 200.0, 5.0];
        let x = [3.3, 171.2, -4.9];
        let restored = denormalize(&normalize(&x, &min, &max), &min, &max);
        for (a, b) in x.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_range_passes_value_through() {
        let scaled = normalize(&[42.0, 5.0], &[42.0, 0.0], &[42.0, 10.0]);
        assert!((scaled[0] - 42.0).abs() < f64::EPSILON);
        assert!((scaled[1] - 0.5).abs() < f64::EPSILON);
        assert!(scaled.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_bounds_from_dataset() {
        let inputs = vec![
            FeatureVector([20.0, 160.0, 55.0, 0.0, 1.0, 50.0, 0.2]),
            FeatureVector([60.0, 190.0, 110.0, 1.0, 5.0, 100.0, 1.0]),
        ];
        let bounds = NormalizationBounds::from_dataset(&inputs, &[1500.0, 3500.0]).unwrap();
        assert_eq!(bounds.input_min[0], 20.0);
        assert_eq!(bounds.input_max[2], 110.0);
        assert!((bounds.normalize_label(2500.0) - 0.5).abs() < 1e-12);
        assert!((bounds.denormalize_label(0.25) - 2000.0).abs() < 1e-9);
        assert!(bounds.degenerate_features().is_empty());
    }

    #[test]
    fn test_mismatched_columns_are_insufficient() {
        let inputs = vec![FeatureVector([1.0; FEATURE_COUNT])];
        assert!(matches!(
            NormalizationBounds::from_dataset(&inputs, &[]),
            Err(RecommendationError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let bounds = NormalizationBounds {
            input_min: [1.0; FEATURE_COUNT],
            input_max: [0.0; FEATURE_COUNT],
            output_min: 0.0,
            output_max: 1.0,
        };
        assert!(bounds.validate().is_err());
    }
}
