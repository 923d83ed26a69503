// ABOUTME: Integration tests for training the regressor and assembling recommendations
// ABOUTME: Covers safety bounds, macro totals, and snapshot persistence through JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pierre_core::models::{ActivityLevel, CalorieSource, Sex, UserProfile};
use pierre_intelligence::nutrition_calculator::minimum_safe_calories;
use pierre_intelligence::regression::{BoundsSnapshot, ModelSnapshot};
use pierre_intelligence::{synthetic_data, CaloriePlan, CalorieRegressor, NutritionConfig, TrainingConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn trained_regressor(seed: u64) -> CalorieRegressor {
    let config = NutritionConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let set = synthetic_data::generate_with_rng(200, &config, &mut rng);
    let mut model = CalorieRegressor::new();
    let summary = model
        .train(&set, false, &TrainingConfig::default(), &mut rng)
        .unwrap();
    assert_eq!(summary.samples, 200);
    assert_eq!(summary.epochs, 30);
    assert!(summary.final_loss.unwrap().is_finite());
    model
}

fn profiles() -> Vec<UserProfile> {
    let mut profiles = Vec::new();
    for sex in [Sex::Male, Sex::Female] {
        for level in ActivityLevel::ALL {
            for (weight, goal) in [(55.0, 50.0), (80.0, 80.0), (70.0, 78.0), (118.0, 95.0)] {
                profiles.push(UserProfile::new(42, 170.0, weight, sex, level, Some(goal)).unwrap());
            }
        }
    }
    profiles
}

#[test]
fn test_recommendations_respect_floor_and_ceiling() {
    let config = NutritionConfig::default();
    let model = trained_regressor(17);

    for profile in profiles() {
        let plan = CaloriePlan::for_profile(&profile, &config).unwrap();
        let rec = plan.finish(model.predict(plan.features()), model.is_using_real_data(), &config);
        let floor = minimum_safe_calories(&profile, &config);
        assert!(f64::from(rec.calories) >= floor, "{rec:?} below floor {floor}");
        assert!(rec.calories <= 4000);
        assert_eq!(rec.macros.total_percentage(), 100);
        assert!(!rec.is_real_data_model);
    }
}

#[test]
fn test_backup_is_used_when_model_is_untrained() {
    let config = NutritionConfig::default();
    let model = CalorieRegressor::new();
    let profile =
        UserProfile::new(30, 180.0, 90.0, Sex::Male, ActivityLevel::Moderate, Some(80.0)).unwrap();
    let plan = CaloriePlan::for_profile(&profile, &config).unwrap();
    let rec = plan.finish(model.predict(plan.features()), false, &config);
    assert_eq!(rec.source, CalorieSource::BackupFormula);
    assert_eq!(rec.calories, 2311);
}

#[test]
fn test_snapshots_survive_json_round_trip() {
    let config = NutritionConfig::default();
    let model = trained_regressor(23);
    let (weights, bounds) = model.to_snapshots().unwrap();

    let weights_json = serde_json::to_vec(&weights).unwrap();
    let bounds_json = serde_json::to_vec(&bounds).unwrap();
    let weights: ModelSnapshot = serde_json::from_slice(&weights_json).unwrap();
    let bounds: BoundsSnapshot = serde_json::from_slice(&bounds_json).unwrap();
    let restored = CalorieRegressor::from_snapshots(&weights, &bounds).unwrap();

    for profile in profiles() {
        let plan = CaloriePlan::for_profile(&profile, &config).unwrap();
        match (model.predict(plan.features()), restored.predict(plan.features())) {
            (Ok(a), Ok(b)) => assert!((a - b).abs() < 1e-6),
            (Err(_), Err(_)) => {}
            (a, b) => panic!("restored model diverged: {a:?} vs {b:?}"),
        }
    }
}
