// ABOUTME: Shared test utilities and fixtures for engine integration tests
// ABOUTME: Seeded fast-training configuration, sample profiles, and engine builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pierre_calorie_engine`

use pierre_calorie_engine::config::EngineConfig;
use pierre_calorie_engine::logging::init_test_logging;
use pierre_calorie_engine::model_store::{InMemoryModelStore, ModelStore};
use pierre_calorie_engine::RecommendationEngine;
use pierre_core::models::{ProfileRecord, TrainingRecord};
use pierre_intelligence::TrainingConfig;
use pierre_providers::{ProfileDataSource, StaticProfileSource};
use std::sync::Arc;

/// Seeded configuration with a short training run and no background retrain
pub fn fast_config() -> EngineConfig {
    init_test_logging();
    EngineConfig {
        training_seed: Some(42),
        background_retrain: false,
        synthetic_samples_min: 100,
        synthetic_samples_max: 120,
        training: TrainingConfig {
            epochs: 5,
            ..TrainingConfig::default()
        },
        ..EngineConfig::default()
    }
}

/// Male, moderate activity, losing 10 kg
pub fn loss_profile() -> ProfileRecord {
    ProfileRecord {
        age: Some(30.0),
        height: Some(180.0),
        weight: Some(90.0),
        sex: Some("male".into()),
        activity_level: Some("moderate".into()),
        weight_goal: Some(80.0),
    }
}

/// Female, light activity, gaining 4 kg
pub fn gain_profile() -> ProfileRecord {
    ProfileRecord {
        age: Some(25.0),
        height: Some(165.0),
        weight: Some(55.0),
        sex: Some("female".into()),
        activity_level: Some("light".into()),
        weight_goal: Some(59.0),
    }
}

/// `count` valid real training records with plausible intakes
pub fn real_records(count: usize) -> Vec<TrainingRecord> {
    (0..count)
        .map(|i| {
            let step = i as f64;
            TrainingRecord {
                profile: ProfileRecord {
                    age: Some(step.mul_add(3.0, 22.0)),
                    height: Some(step.mul_add(2.0, 160.0)),
                    weight: Some(step.mul_add(4.0, 60.0)),
                    sex: Some(if i % 2 == 0 { "male" } else { "female" }.into()),
                    activity_level: Some("moderate".into()),
                    weight_goal: Some(step.mul_add(4.0, 55.0)),
                },
                calorie_intake: Some(step.mul_add(60.0, 1900.0)),
            }
        })
        .collect()
}

/// Engine over a fresh in-memory store; the store handle shares its contents
pub fn engine_with(
    config: EngineConfig,
    source: Option<Arc<dyn ProfileDataSource>>,
) -> (RecommendationEngine, InMemoryModelStore) {
    let store = InMemoryModelStore::new();
    let shared: Arc<dyn ModelStore> = Arc::new(store.clone());
    (RecommendationEngine::new(config, shared, source), store)
}

/// Static source serving `count` real records
pub fn static_source(count: usize) -> Arc<dyn ProfileDataSource> {
    Arc::new(StaticProfileSource::new(real_records(count)))
}
