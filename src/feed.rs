// ABOUTME: Reactive recommendation feed that recomputes whenever the active profile changes
// ABOUTME: Publishes views over a watch channel and discards results for superseded profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recommendation Feed
//!
//! Presentation code hands the feed the current profile and watches a
//! [`RecommendationView`]. Each profile change starts a prediction tagged with
//! a fresh request id. A prediction writes its result only if its id is still
//! the latest one, so a slow answer for an old profile can never overwrite the
//! answer for a newer one.
//!
//! The feed computes through the [`Recommender`] trait, which
//! [`RecommendationEngine`] implements.

use crate::engine::RecommendationEngine;
use async_trait::async_trait;
use pierre_core::errors::RecommendationError;
use pierre_core::models::{ProfileRecord, Recommendation};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Anything that can turn a raw profile into a recommendation
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Recommend for `profile`; `Ok(None)` when it has no weight goal
    ///
    /// # Errors
    ///
    /// Returns a user-facing error when the profile cannot be used
    async fn recommend(
        &self,
        profile: &ProfileRecord,
    ) -> Result<Option<Recommendation>, RecommendationError>;
}

#[async_trait]
impl Recommender for RecommendationEngine {
    async fn recommend(
        &self,
        profile: &ProfileRecord,
    ) -> Result<Option<Recommendation>, RecommendationError> {
        Self::recommend(self, profile).await
    }
}

/// What presentation code renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationView {
    /// Latest recommendation; kept while a newer one is loading
    pub recommendation: Option<Recommendation>,
    /// A prediction for the current profile is in flight
    pub loading: bool,
    /// User-facing failure for the current profile
    pub error: Option<RecommendationError>,
    /// Id of the profile change this view belongs to
    pub request_id: u64,
}

impl RecommendationView {
    /// Human-readable error message, if any
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Last-profile-wins recommendation feed over one recommender
#[derive(Clone)]
pub struct RecommendationFeed {
    recommender: Arc<dyn Recommender>,
    view: Arc<watch::Sender<RecommendationView>>,
}

impl RecommendationFeed {
    /// Feed with an empty view, usually over a [`RecommendationEngine`]
    #[must_use]
    pub fn new<R: Recommender + 'static>(recommender: R) -> Self {
        let (view, _) = watch::channel(RecommendationView::default());
        Self {
            recommender: Arc::new(recommender),
            view: Arc::new(view),
        }
    }

    /// Receiver notified on every view change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RecommendationView> {
        self.view.subscribe()
    }

    /// Snapshot of the current view
    #[must_use]
    pub fn current(&self) -> RecommendationView {
        self.view.borrow().clone()
    }

    /// Make `profile` the active profile and start computing for it.
    ///
    /// `None` clears the view. The returned handle completes once the
    /// prediction has been published or discarded.
    pub fn set_profile(&self, profile: Option<ProfileRecord>) -> JoinHandle<()> {
        let mut request_id = 0;
        self.view.send_modify(|view| {
            view.request_id += 1;
            request_id = view.request_id;
            view.error = None;
            view.loading = profile.is_some();
            if profile.is_none() {
                view.recommendation = None;
            }
        });

        let recommender = Arc::clone(&self.recommender);
        let view = Arc::clone(&self.view);
        tokio::spawn(async move {
            let Some(profile) = profile else {
                return;
            };
            let outcome = recommender.recommend(&profile).await;
            let published = view.send_if_modified(|current| {
                if current.request_id != request_id {
                    return false;
                }
                current.loading = false;
                match outcome {
                    Ok(recommendation) => {
                        current.recommendation = recommendation;
                        current.error = None;
                    }
                    Err(error) => {
                        current.recommendation = None;
                        current.error = Some(error);
                    }
                }
                true
            });
            if !published {
                debug!(request_id, "recommendation superseded by a newer profile");
            }
        })
    }
}
