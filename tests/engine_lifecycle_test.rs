// ABOUTME: Integration tests for the recommendation engine lifecycle
// ABOUTME: Covers initialization paths, corrupt persisted state, exclusive training, and reset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{engine_with, fast_config, gain_profile, loss_profile, static_source};
use pierre_calorie_engine::config::EngineConfig;
use pierre_calorie_engine::model_store::{FileModelStore, ModelStore};
use pierre_calorie_engine::{EngineState, ModelProvenance, RecommendationEngine, TrainingMode};
use pierre_core::constants::storage_keys::{MODEL_NORMALIZATION_KEY, MODEL_WEIGHTS_KEY};
use pierre_core::errors::{ErrorCode, RecommendationError};
use pierre_core::models::{ProfileRecord, UserProfile};
use pierre_intelligence::nutrition_calculator::minimum_safe_calories;
use pierre_intelligence::CaloriePlan;
use pierre_providers::{ProfileDataSource, StaticProfileSource};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_incomplete_profile_is_rejected_before_initialization() {
    let (engine, store) = engine_with(fast_config(), None);
    let profile = ProfileRecord {
        activity_level: None,
        ..loss_profile()
    };

    let result = engine.recommend(&profile).await;

    assert_eq!(
        result,
        Err(RecommendationError::IncompleteProfile {
            field: "activityLevel"
        })
    );
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_profile_without_goal_has_no_recommendation() {
    let (engine, _store) = engine_with(fast_config(), None);
    let profile = ProfileRecord {
        weight_goal: None,
        ..loss_profile()
    };

    assert_eq!(engine.recommend(&profile).await.unwrap(), None);
}

#[tokio::test]
async fn test_first_use_trains_synthetic_model_and_persists_it() {
    let (engine, store) = engine_with(fast_config(), None);

    let recommendation = engine.recommend(&loss_profile()).await.unwrap().unwrap();

    assert!(!recommendation.is_real_data_model);
    assert!((recommendation.target_rate - 0.7).abs() < 1e-9);
    assert!(recommendation.calories <= 4000);
    assert_eq!(recommendation.macros.total_percentage(), 100);
    assert_eq!(
        engine.state(),
        EngineState::Ready(ModelProvenance::SyntheticData)
    );
    assert!(store.contains(MODEL_WEIGHTS_KEY).await);
    assert!(store.contains(MODEL_NORMALIZATION_KEY).await);
}

#[tokio::test]
async fn test_recommendation_respects_safety_floor() {
    let config = fast_config();
    let nutrition = config.nutrition.clone();
    let (engine, _store) = engine_with(config, None);

    for record in [loss_profile(), gain_profile()] {
        let profile = UserProfile::try_from(&record).unwrap();
        let floor = minimum_safe_calories(&profile, &nutrition);
        let recommendation = engine.recommend(&record).await.unwrap().unwrap();
        assert!(f64::from(recommendation.calories) >= floor);
        assert!(recommendation.calories <= 4000);
    }
}

#[tokio::test]
async fn test_weights_without_normalization_are_cleared_and_retrained() {
    let (engine, store) = engine_with(fast_config(), None);
    store
        .put(MODEL_WEIGHTS_KEY, br#"{"formatVersion":1}"#)
        .await
        .unwrap();

    let recommendation = engine.recommend(&loss_profile()).await.unwrap().unwrap();

    assert!(!recommendation.is_real_data_model);
    assert!(!engine.is_real_data_model().await);
    assert_eq!(
        engine.state(),
        EngineState::Ready(ModelProvenance::SyntheticData)
    );
    let weights = store.get(MODEL_WEIGHTS_KEY).await.unwrap().unwrap();
    assert_ne!(weights, br#"{"formatVersion":1}"#.to_vec());
    assert!(store.contains(MODEL_NORMALIZATION_KEY).await);
}

#[tokio::test]
async fn test_enough_real_records_train_real_model() {
    let (engine, _store) = engine_with(fast_config(), Some(static_source(8)));

    let recommendation = engine.recommend(&loss_profile()).await.unwrap().unwrap();

    assert!(recommendation.is_real_data_model);
    assert_eq!(engine.state(), EngineState::Ready(ModelProvenance::RealData));
}

#[tokio::test]
async fn test_too_few_real_records_fall_back_to_synthetic() {
    let (engine, _store) = engine_with(fast_config(), Some(static_source(3)));

    let recommendation = engine.recommend(&loss_profile()).await.unwrap().unwrap();
    assert!(!recommendation.is_real_data_model);

    let retrain = engine.retrain_with_real_data().await;
    assert_eq!(
        retrain,
        Err(RecommendationError::InsufficientData {
            available: 3,
            required: 5
        })
    );
    assert_eq!(
        engine.state(),
        EngineState::Ready(ModelProvenance::SyntheticData)
    );
}

#[tokio::test]
async fn test_loaded_synthetic_model_is_replaced_in_background() {
    let (seed_engine, store) = engine_with(fast_config(), None);
    seed_engine.train(TrainingMode::SyntheticOnly).await.unwrap();

    let config = EngineConfig {
        background_retrain: true,
        ..fast_config()
    };
    let shared: Arc<dyn ModelStore> = Arc::new(store.clone());
    let engine = RecommendationEngine::new(config, shared, Some(static_source(6)));

    let first = engine.recommend(&loss_profile()).await.unwrap().unwrap();
    assert!(!first.is_real_data_model);

    let report = engine
        .wait_for_background_retrain()
        .await
        .expect("retrain scheduled")
        .unwrap();
    assert!(report.summary.is_using_real_data);
    assert_eq!(report.summary.samples, 6);
    assert!(report.persisted);
    assert!(engine.wait_for_background_retrain().await.is_none());

    let second = engine.recommend(&loss_profile()).await.unwrap().unwrap();
    assert!(second.is_real_data_model);
    assert_eq!(engine.state(), EngineState::Ready(ModelProvenance::RealData));
}

#[tokio::test]
async fn test_concurrent_training_is_rejected() {
    let (engine, _store) = engine_with(fast_config(), None);

    let (first, second) = tokio::join!(
        engine.train(TrainingMode::SyntheticOnly),
        engine.train(TrainingMode::SyntheticOnly)
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| r == &Err(RecommendationError::TrainingBusy)));
}

#[tokio::test]
async fn test_reset_clears_store_and_model() {
    let (engine, store) = engine_with(fast_config(), None);
    engine.train(TrainingMode::SyntheticOnly).await.unwrap();
    assert!(!store.is_empty().await);

    engine.reset().await.unwrap();

    assert!(store.is_empty().await);
    assert_eq!(engine.state(), EngineState::Uninitialized);

    engine.recommend(&loss_profile()).await.unwrap().unwrap();
    assert_eq!(
        engine.state(),
        EngineState::Ready(ModelProvenance::SyntheticData)
    );
}

#[tokio::test]
async fn test_file_store_model_survives_restart() {
    let dir = TempDir::new().unwrap();
    let profile = loss_profile();

    let first = RecommendationEngine::new(
        fast_config(),
        Arc::new(FileModelStore::new(dir.path())),
        None,
    );
    let trained = first.recommend(&profile).await.unwrap().unwrap();

    let second = RecommendationEngine::new(
        fast_config(),
        Arc::new(FileModelStore::new(dir.path())),
        None,
    );
    let loaded = second.recommend(&profile).await.unwrap().unwrap();

    assert_eq!(
        second.state(),
        EngineState::Ready(ModelProvenance::SyntheticData)
    );
    assert_eq!(trained.source, loaded.source);
    assert!(trained.calories.abs_diff(loaded.calories) <= 1);
}

#[tokio::test]
async fn test_recommend_for_user_uses_profile_source() {
    let source: Arc<dyn ProfileDataSource> =
        Arc::new(StaticProfileSource::empty().with_profile("42", gain_profile()));
    let (engine, _store) = engine_with(fast_config(), Some(source));

    let recommendation = engine.recommend_for_user("42").await.unwrap().unwrap();
    let plan = CaloriePlan::for_profile(
        &UserProfile::try_from(&gain_profile()).unwrap(),
        &engine.config().nutrition,
    )
    .unwrap();
    assert!((recommendation.target_rate - plan.target_rate()).abs() < 1e-9);

    let missing = engine.recommend_for_user("7").await.unwrap_err();
    assert_eq!(missing.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_recommend_for_user_requires_source() {
    let (engine, _store) = engine_with(fast_config(), None);

    let error = engine.recommend_for_user("42").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::ConfigError);
}
