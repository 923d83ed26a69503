// ABOUTME: Synthetic training data generator for bootstrapping the calorie model
// ABOUTME: Samples plausible profiles and labels them with Harris-Benedict plus jitter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Synthetic training data.
//!
//! Used when the profile service cannot supply enough real examples. The
//! output is NOT deterministic when drawn from [`generate`]; pass a seeded
//! RNG to [`generate_with_rng`] for reproducible sets.

use crate::config::NutritionConfig;
use crate::nutrition_calculator::{
    calculate_harris_benedict, calculate_tdee, daily_calorie_adjustment,
};
use pierre_core::models::{
    ActivityLevel, FeatureVector, GoalDirection, Sex, TrainingExample, TrainingSet,
};
use rand::Rng;

/// Sampled age range in years (inclusive)
pub const AGE_RANGE: (u32, u32) = (18, 77);
/// Sampled height range in cm (inclusive, whole centimeters)
pub const HEIGHT_RANGE: (u32, u32) = (150, 199);
/// Sampled weight range in kg (inclusive, whole kilograms)
pub const WEIGHT_RANGE: (u32, u32) = (50, 119);
/// Goal weight as a fraction of current weight
pub const GOAL_RATIO_RANGE: (f64, f64) = (0.8, 1.2);
/// Weekly target rate in kg
pub const TARGET_RATE_RANGE: (f64, f64) = (0.2, 1.0);
/// Multiplicative label noise
pub const LABEL_NOISE_RANGE: (f64, f64) = (0.95, 1.05);

/// Generate `n` synthetic examples with the thread-local RNG
#[must_use]
pub fn generate(n: usize, config: &NutritionConfig) -> TrainingSet {
    generate_with_rng(n, config, &mut rand::thread_rng())
}

/// Generate `n` synthetic examples from the supplied RNG
pub fn generate_with_rng<R: Rng + ?Sized>(
    n: usize,
    config: &NutritionConfig,
    rng: &mut R,
) -> TrainingSet {
    (0..n).map(|_| sample(config, rng)).collect()
}

fn sample<R: Rng + ?Sized>(config: &NutritionConfig, rng: &mut R) -> TrainingExample {
    let sex = if rng.gen_bool(0.5) {
        Sex::Male
    } else {
        Sex::Female
    };
    let age = rng.gen_range(AGE_RANGE.0..=AGE_RANGE.1);
    let height = f64::from(rng.gen_range(HEIGHT_RANGE.0..=HEIGHT_RANGE.1));
    let weight = f64::from(rng.gen_range(WEIGHT_RANGE.0..=WEIGHT_RANGE.1));
    let activity = ActivityLevel::ALL[rng.gen_range(0..ActivityLevel::ALL.len())];
    let weight_goal = weight * rng.gen_range(GOAL_RATIO_RANGE.0..GOAL_RATIO_RANGE.1);
    let target_rate = rng.gen_range(TARGET_RATE_RANGE.0..TARGET_RATE_RANGE.1);

    let bmr = calculate_harris_benedict(weight, height, age, sex, &config.bmr);
    let tdee = calculate_tdee(bmr, activity, &config.activity_factors);
    let direction = if weight_goal < weight {
        GoalDirection::Loss
    } else {
        GoalDirection::Gain
    };
    let target = tdee + daily_calorie_adjustment(target_rate, direction);
    let noise = rng.gen_range(LABEL_NOISE_RANGE.0..LABEL_NOISE_RANGE.1);

    TrainingExample {
        features: FeatureVector([
            f64::from(age),
            height,
            weight,
            sex.code(),
            f64::from(activity.code()),
            weight_goal,
            target_rate,
        ]),
        calories: (target * noise).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generates_requested_count() {
        let set = generate(150, &NutritionConfig::default());
        assert_eq!(set.len(), 150);
        assert_eq!(set.outputs.len(), 150);
    }

    #[test]
    fn test_features_within_sampling_ranges() {
        let set = generate(500, &NutritionConfig::default());
        for row in &set.inputs {
            let f = row.0;
            assert!((18.0..=77.0).contains(&f[FeatureVector::AGE]));
            assert!((150.0..=199.0).contains(&f[FeatureVector::HEIGHT]));
            assert!((50.0..=119.0).contains(&f[FeatureVector::WEIGHT]));
            assert!(f[FeatureVector::SEX] == 0.0 || f[FeatureVector::SEX] == 1.0);
            assert!((1.0..=5.0).contains(&f[FeatureVector::ACTIVITY]));
            let ratio = f[FeatureVector::WEIGHT_GOAL] / f[FeatureVector::WEIGHT];
            assert!((0.8..1.2).contains(&ratio));
            assert!((0.2..1.0).contains(&f[FeatureVector::TARGET_RATE]));
        }
    }

    #[test]
    fn test_labels_are_plausible() {
        let set = generate(500, &NutritionConfig::default());
        let mean = set.outputs.iter().sum::<f64>() / set.outputs.len() as f64;
        assert!(set.outputs.iter().all(|kcal| kcal.fract() == 0.0));
        assert!(set.outputs.iter().all(|kcal| (0.0..6500.0).contains(kcal)));
        assert!((1800.0..3200.0).contains(&mean), "mean label {mean}");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = NutritionConfig::default();
        let a = generate_with_rng(50, &config, &mut ChaCha8Rng::seed_from_u64(7));
        let b = generate_with_rng(50, &config, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
