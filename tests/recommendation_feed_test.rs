// ABOUTME: Integration tests for the reactive recommendation feed
// ABOUTME: Verifies loading flags, error surfacing, and that superseded results are discarded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use async_trait::async_trait;
use common::{engine_with, fast_config, gain_profile, loss_profile, real_records};
use pierre_calorie_engine::{RecommendationEngine, RecommendationFeed, Recommender};
use pierre_core::errors::RecommendationError;
use pierre_core::models::{ProfileRecord, Recommendation, TrainingRecord};
use pierre_providers::{ProfileDataSource, ProviderResult};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task;

/// Source whose bulk fetch blocks until the test opens the gate
struct GatedSource {
    gate: Arc<Notify>,
}

#[async_trait]
impl ProfileDataSource for GatedSource {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn fetch_training_records(&self) -> ProviderResult<Vec<TrainingRecord>> {
        self.gate.notified().await;
        Ok(real_records(2))
    }

    async fn fetch_current_profile(&self, _user_id: &str) -> ProviderResult<Option<ProfileRecord>> {
        Ok(None)
    }
}

/// Engine wrapper that holds back one profile until the test opens the gate
struct GatedRecommender {
    engine: RecommendationEngine,
    slow_profile: ProfileRecord,
    gate: Arc<Notify>,
}

#[async_trait]
impl Recommender for GatedRecommender {
    async fn recommend(
        &self,
        profile: &ProfileRecord,
    ) -> Result<Option<Recommendation>, RecommendationError> {
        if *profile == self.slow_profile {
            self.gate.notified().await;
        }
        self.engine.recommend(profile).await
    }
}

#[tokio::test]
async fn test_feed_publishes_recommendation_for_profile() {
    let (engine, _store) = engine_with(fast_config(), None);
    let feed = RecommendationFeed::new(engine.clone());

    let handle = feed.set_profile(Some(loss_profile()));
    assert!(feed.current().loading);
    handle.await.unwrap();

    let view = feed.current();
    assert!(!view.loading);
    assert!(view.error.is_none());
    assert_eq!(view.request_id, 1);
    let expected = engine.recommend(&loss_profile()).await.unwrap();
    assert_eq!(view.recommendation, expected);
}

#[tokio::test]
async fn test_feed_surfaces_incomplete_profile() {
    let (engine, _store) = engine_with(fast_config(), None);
    let feed = RecommendationFeed::new(engine);
    let profile = ProfileRecord {
        sex: None,
        ..loss_profile()
    };

    feed.set_profile(Some(profile)).await.unwrap();

    let view = feed.current();
    assert_eq!(
        view.error,
        Some(RecommendationError::IncompleteProfile { field: "sex" })
    );
    assert_eq!(
        view.error_message().as_deref(),
        Some("Profile is incomplete: missing sex")
    );
    assert!(view.recommendation.is_none());
}

#[tokio::test]
async fn test_slow_result_for_replaced_profile_is_discarded() {
    let gate = Arc::new(Notify::new());
    let source: Arc<dyn ProfileDataSource> = Arc::new(GatedSource {
        gate: Arc::clone(&gate),
    });
    let (engine, _store) = engine_with(fast_config(), Some(source));
    let feed = RecommendationFeed::new(engine);
    let mut updates = feed.subscribe();

    // Profile A blocks inside engine initialization until the gate opens
    let slow = feed.set_profile(Some(loss_profile()));
    task::yield_now().await;

    // Profile B is rejected immediately and becomes the current view
    let replacement = ProfileRecord {
        age: None,
        ..gain_profile()
    };
    feed.set_profile(Some(replacement)).await.unwrap();
    let current = feed.current();
    assert_eq!(current.request_id, 2);
    assert_eq!(
        current.error,
        Some(RecommendationError::IncompleteProfile { field: "age" })
    );

    updates.borrow_and_update();
    gate.notify_one();
    slow.await.unwrap();

    assert!(!updates.has_changed().unwrap());
    let view = feed.current();
    assert_eq!(view.request_id, 2);
    assert!(view.recommendation.is_none());
    assert_eq!(
        view.error,
        Some(RecommendationError::IncompleteProfile { field: "age" })
    );
}

#[tokio::test]
async fn test_slow_valid_result_does_not_replace_newer_valid_result() {
    let (engine, _store) = engine_with(fast_config(), None);
    let slow_expected = engine.recommend(&loss_profile()).await.unwrap();
    let fast_expected = engine.recommend(&gain_profile()).await.unwrap();
    assert!(slow_expected.is_some() && fast_expected.is_some());
    assert_ne!(slow_expected, fast_expected);

    let gate = Arc::new(Notify::new());
    let feed = RecommendationFeed::new(GatedRecommender {
        engine,
        slow_profile: loss_profile(),
        gate: Arc::clone(&gate),
    });
    let mut updates = feed.subscribe();

    let slow = feed.set_profile(Some(loss_profile()));
    feed.set_profile(Some(gain_profile())).await.unwrap();
    let current = feed.current();
    assert_eq!(current.request_id, 2);
    assert!(!current.loading);
    assert_eq!(current.recommendation, fast_expected);

    updates.borrow_and_update();
    gate.notify_one();
    slow.await.unwrap();

    assert!(!updates.has_changed().unwrap());
    let view = feed.current();
    assert_eq!(view.request_id, 2);
    assert!(!view.loading);
    assert!(view.error.is_none());
    assert_eq!(view.recommendation, fast_expected);
}

#[tokio::test]
async fn test_last_of_rapid_profile_changes_wins() {
    let (engine, _store) = engine_with(fast_config(), None);
    let feed = RecommendationFeed::new(engine.clone());

    let first = feed.set_profile(Some(loss_profile()));
    let second = feed.set_profile(Some(gain_profile()));
    first.await.unwrap();
    second.await.unwrap();

    let view = feed.current();
    assert_eq!(view.request_id, 2);
    assert!(!view.loading);
    let expected = engine.recommend(&gain_profile()).await.unwrap();
    assert_eq!(view.recommendation, expected);
}

#[tokio::test]
async fn test_clearing_profile_empties_view() {
    let (engine, _store) = engine_with(fast_config(), None);
    let feed = RecommendationFeed::new(engine);
    feed.set_profile(Some(loss_profile())).await.unwrap();
    assert!(feed.current().recommendation.is_some());

    feed.set_profile(None).await.unwrap();

    let view = feed.current();
    assert!(view.recommendation.is_none());
    assert!(!view.loading);
    assert_eq!(view.request_id, 2);
}

#[tokio::test]
async fn test_feeds_share_one_engine() {
    let (engine, _store) = engine_with(fast_config(), None);
    let feeds: Vec<RecommendationFeed> = (0..3)
        .map(|_| RecommendationFeed::new(RecommendationEngine::clone(&engine)))
        .collect();

    for feed in &feeds {
        feed.set_profile(Some(loss_profile())).await.unwrap();
    }

    let calories: Vec<u32> = feeds
        .iter()
        .map(|feed| feed.current().recommendation.unwrap().calories)
        .collect();
    assert!(calories.windows(2).all(|pair| pair[0] == pair[1]));
}
