// ABOUTME: Recommendation Engine orchestrating model lifecycle, data sourcing, and prediction
// ABOUTME: Loads or trains the model once, predicts with formula fallback, retrains exclusively
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recommendation Engine
//!
//! Owns the single in-memory calorie model and is its only writer.
//!
//! - On first use the engine loads the persisted model. If that fails it
//!   trains on real profile history when enough valid records exist and on
//!   synthetic examples otherwise. A failed training run leaves the engine
//!   ready with the backup formula.
//! - A loaded synthetic model schedules a best-effort background retrain on
//!   real data. The handle is kept so callers can await the outcome.
//! - Training is exclusive engine-wide. A concurrent attempt fails with
//!   `TrainingBusy`. The fit runs on the blocking pool and the finished model
//!   is swapped in whole, so predictions never see a half-trained network.

mod state;
mod training_guard;

pub use state::{EngineState, ModelProvenance};

use crate::config::EngineConfig;
use crate::model_store::{FileModelStore, ModelStore};
use crate::persistence;
use pierre_core::errors::{AppError, AppResult, RecommendationError};
use pierre_core::models::{ProfileRecord, Recommendation, TrainingSet, UserProfile};
use pierre_intelligence::regression::{CalorieRegressor, TrainingSummary};
use pierre_intelligence::{synthetic_data, training_data, CaloriePlan};
use pierre_providers::{initialize_shared_client, HttpProfileSource, ProfileDataSource};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use state::{Lifecycle, Phase, PredictionGuard};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, warn};
use training_guard::TrainingGuard;

/// Which data a training run may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Real records when enough are valid, synthetic examples otherwise
    PreferRealData,
    /// Real records only; fails with `InsufficientData` when too few
    RealDataOnly,
    /// Synthetic examples only
    SyntheticOnly,
}

/// Outcome of a completed training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainReport {
    /// Training statistics
    pub summary: TrainingSummary,
    /// Whether both halves reached the model store
    pub persisted: bool,
}

type BackgroundRetrain = JoinHandle<Result<RetrainReport, RecommendationError>>;

struct EngineInner {
    config: EngineConfig,
    store: Arc<dyn ModelStore>,
    source: Option<Arc<dyn ProfileDataSource>>,
    model: RwLock<Option<Arc<CalorieRegressor>>>,
    lifecycle: watch::Sender<Lifecycle>,
    init_lock: Mutex<()>,
    training: AtomicBool,
    training_runs: AtomicU64,
    background: Mutex<Option<BackgroundRetrain>>,
}

/// Calorie and macro recommendation engine.
///
/// Cloning is cheap and every clone drives the same model.
#[derive(Clone)]
pub struct RecommendationEngine {
    inner: Arc<EngineInner>,
}

impl RecommendationEngine {
    /// Engine over an explicit store and optional profile source
    #[must_use]
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn ModelStore>,
        source: Option<Arc<dyn ProfileDataSource>>,
    ) -> Self {
        let (lifecycle, _) = watch::channel(Lifecycle::default());
        Self {
            inner: Arc::new(EngineInner {
                config,
                store,
                source,
                model: RwLock::new(None),
                lifecycle,
                init_lock: Mutex::new(()),
                training: AtomicBool::new(false),
                training_runs: AtomicU64::new(0),
                background: Mutex::new(None),
            }),
        }
    }

    /// Engine with a file store and, when configured, the HTTP profile service
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the profile service URL is invalid
    pub fn from_config(config: EngineConfig) -> AppResult<Self> {
        initialize_shared_client(config.http);
        let store: Arc<dyn ModelStore> = Arc::new(FileModelStore::new(&config.model_store_dir));
        let source = config
            .profile_api_url
            .as_deref()
            .map(HttpProfileSource::new)
            .transpose()?
            .map(|http| Arc::new(http) as Arc<dyn ProfileDataSource>);
        Ok(Self::new(config, store, source))
    }

    /// Engine configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.inner.lifecycle.borrow().state()
    }

    /// Message of the last initialization failure, if the engine fell back
    /// to the backup formula
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner.lifecycle.borrow().last_error.clone()
    }

    /// Whether the model in memory was trained on real data
    pub async fn is_real_data_model(&self) -> bool {
        self.inner
            .model
            .read()
            .await
            .as_ref()
            .is_some_and(|model| model.is_using_real_data())
    }

    /// Recommend daily calories and macros for a raw profile.
    ///
    /// Returns `Ok(None)` when the profile has no weight goal. Model failures
    /// never surface here; they substitute the backup formula.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteProfile` or `InvalidProfile` before any prediction
    /// is attempted
    pub async fn recommend(
        &self,
        record: &ProfileRecord,
    ) -> Result<Option<Recommendation>, RecommendationError> {
        let profile = UserProfile::try_from(record)?;
        Ok(self.recommend_profile(&profile).await)
    }

    /// Recommend for an already validated profile; `None` without a weight goal
    pub async fn recommend_profile(&self, profile: &UserProfile) -> Option<Recommendation> {
        self.ensure_initialized().await;

        let nutrition = &self.inner.config.nutrition;
        let Some(plan) = CaloriePlan::for_profile(profile, nutrition) else {
            debug!("profile has no weight goal, no recommendation");
            return None;
        };

        let _predicting = PredictionGuard::enter(&self.inner.lifecycle);
        let model = self.inner.model.read().await.clone();
        let (prediction, is_real_data_model) = match model {
            Some(model) => (model.predict(plan.features()), model.is_using_real_data()),
            None => (Err(RecommendationError::ModelNotReady), false),
        };
        if let Err(RecommendationError::PredictionOutOfRange { value }) = &prediction {
            warn!(value, "model prediction outside sane range, using backup formula");
        }
        Some(plan.finish(prediction, is_real_data_model, nutrition))
    }

    /// Fetch a user's current profile from the profile source and recommend
    ///
    /// # Errors
    ///
    /// Returns an error if no source is configured, the user is unknown, the
    /// source fails, or the profile is incomplete
    pub async fn recommend_for_user(&self, user_id: &str) -> AppResult<Option<Recommendation>> {
        let source = self
            .inner
            .source
            .as_ref()
            .ok_or_else(|| AppError::config("no profile source configured"))?;
        let record = source
            .fetch_current_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("profile {user_id}")))?;
        Ok(self.recommend(&record).await?)
    }

    /// Train a fresh model and swap it in, then persist it
    ///
    /// # Errors
    ///
    /// Returns `TrainingBusy` if another run is in progress, `InsufficientData`
    /// when real data is required but too few records are valid, or
    /// `Training` if the fit fails
    pub async fn train(&self, mode: TrainingMode) -> Result<RetrainReport, RecommendationError> {
        let _guard = TrainingGuard::try_acquire(&self.inner.training)
            .ok_or(RecommendationError::TrainingBusy)?;
        self.train_exclusive(mode).await
    }

    /// Retrain using real profile history only
    ///
    /// # Errors
    ///
    /// See [`Self::train`]
    pub async fn retrain_with_real_data(&self) -> Result<RetrainReport, RecommendationError> {
        self.train(TrainingMode::RealDataOnly).await
    }

    /// Await the background retrain scheduled after loading a synthetic model.
    ///
    /// Returns `None` when none was scheduled or it was already awaited.
    pub async fn wait_for_background_retrain(
        &self,
    ) -> Option<Result<RetrainReport, RecommendationError>> {
        let handle = self.inner.background.lock().await.take()?;
        Some(handle.await.unwrap_or_else(|e| {
            Err(RecommendationError::Training {
                reason: format!("background retrain task failed: {e}"),
            })
        }))
    }

    /// Clear the persisted and in-memory model and return to `Uninitialized`
    ///
    /// # Errors
    ///
    /// Returns `TrainingBusy` if a foreground training run is in progress, or
    /// a storage error if the persisted keys cannot be deleted
    pub async fn reset(&self) -> AppResult<()> {
        if let Some(handle) = self.inner.background.lock().await.take() {
            handle.abort();
            let _ = handle.await;
        }
        let _guard = TrainingGuard::try_acquire(&self.inner.training)
            .ok_or(RecommendationError::TrainingBusy)?;
        let _init = self.inner.init_lock.lock().await;

        persistence::clear_model(self.inner.store.as_ref()).await?;
        *self.inner.model.write().await = None;
        self.inner.lifecycle.send_modify(|l| {
            l.phase = Phase::Uninitialized;
            l.last_error = None;
        });
        info!("calorie engine reset");
        Ok(())
    }

    async fn ensure_initialized(&self) {
        if !self.is_uninitialized() {
            return;
        }
        let _init = self.inner.init_lock.lock().await;
        if self.is_uninitialized() {
            self.initialize().await;
        }
    }

    fn is_uninitialized(&self) -> bool {
        self.inner.lifecycle.borrow().phase == Phase::Uninitialized
    }

    async fn initialize(&self) {
        self.inner
            .lifecycle
            .send_modify(|l| l.phase = Phase::Initializing);

        match persistence::load_model(self.inner.store.as_ref()).await {
            Ok(model) => {
                let is_real = model.is_using_real_data();
                *self.inner.model.write().await = Some(Arc::new(model));
                self.set_ready(ModelProvenance::of_model(is_real));
                if !is_real && self.inner.config.background_retrain && self.inner.source.is_some() {
                    self.schedule_background_retrain().await;
                }
            }
            Err(load_error) => {
                info!(reason = %load_error, "no usable persisted model, training a new one");
                if let Err(e) = self.train(TrainingMode::PreferRealData).await {
                    error!(error = %e, "initial training failed, using backup formula");
                    self.inner.lifecycle.send_modify(|l| {
                        l.phase = Phase::Error;
                        l.last_error = Some(e.to_string());
                    });
                    self.set_ready(ModelProvenance::BackupFormula);
                }
            }
        }
    }

    async fn schedule_background_retrain(&self) {
        let engine = self.clone();
        let handle = tokio::spawn(async move {
            let result = engine.retrain_with_real_data().await;
            match &result {
                Ok(report) => info!(
                    samples = report.summary.samples,
                    persisted = report.persisted,
                    "background retrain with real data finished"
                ),
                Err(e) => warn!(error = %e, "background retrain with real data failed"),
            }
            result
        });
        if let Some(previous) = self.inner.background.lock().await.replace(handle) {
            previous.abort();
        }
    }

    fn set_ready(&self, provenance: ModelProvenance) {
        self.inner
            .lifecycle
            .send_modify(|l| l.phase = Phase::Ready(provenance));
    }

    async fn train_exclusive(&self, mode: TrainingMode) -> Result<RetrainReport, RecommendationError> {
        let mut rng = self.training_rng();
        let (set, is_real) = self.acquire_dataset(mode, &mut rng).await?;
        let config = self.inner.config.training.clone();

        let (model, summary) = task::spawn_blocking(move || {
            let mut model = CalorieRegressor::new();
            let summary = model.train(&set, is_real, &config, &mut rng)?;
            Ok::<_, RecommendationError>((model, summary))
        })
        .await
        .map_err(|e| RecommendationError::Training {
            reason: format!("training task failed: {e}"),
        })??;

        let model = Arc::new(model);
        *self.inner.model.write().await = Some(Arc::clone(&model));
        self.set_ready(ModelProvenance::of_model(is_real));

        let persisted = match persistence::save_model(self.inner.store.as_ref(), &model).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "trained model could not be persisted");
                false
            }
        };
        Ok(RetrainReport { summary, persisted })
    }

    async fn acquire_dataset(
        &self,
        mode: TrainingMode,
        rng: &mut ChaCha8Rng,
    ) -> Result<(TrainingSet, bool), RecommendationError> {
        let required = self.inner.config.min_training_examples;
        match mode {
            TrainingMode::SyntheticOnly => Ok((self.synthetic_dataset(rng), false)),
            TrainingMode::RealDataOnly => {
                let set = self.real_dataset().await?;
                if set.len() < required {
                    return Err(RecommendationError::InsufficientData {
                        available: set.len(),
                        required,
                    });
                }
                Ok((set, true))
            }
            TrainingMode::PreferRealData => match self.real_dataset().await {
                Ok(set) if set.len() >= required => Ok((set, true)),
                Ok(set) => {
                    info!(
                        available = set.len(),
                        required, "not enough real training data, using synthetic examples"
                    );
                    Ok((self.synthetic_dataset(rng), false))
                }
                Err(e) => {
                    warn!(error = %e, "real training data unavailable, using synthetic examples");
                    Ok((self.synthetic_dataset(rng), false))
                }
            },
        }
    }

    async fn real_dataset(&self) -> Result<TrainingSet, RecommendationError> {
        let Some(source) = &self.inner.source else {
            debug!("no profile source configured");
            return Ok(TrainingSet::default());
        };
        let records = source
            .fetch_training_records()
            .await
            .map_err(|e| RecommendationError::Training {
                reason: format!("{} failed: {e}", source.name()),
            })?;
        let set = training_data::training_set_from_records(&records, &self.inner.config.nutrition.rates);
        debug!(
            fetched = records.len(),
            usable = set.len(),
            "real training records"
        );
        Ok(set)
    }

    fn synthetic_dataset(&self, rng: &mut ChaCha8Rng) -> TrainingSet {
        let config = &self.inner.config;
        let count = rng.gen_range(config.synthetic_samples_min..=config.synthetic_samples_max);
        debug!(count, "generating synthetic training data");
        synthetic_data::generate_with_rng(count, &config.nutrition, rng)
    }

    fn training_rng(&self) -> ChaCha8Rng {
        let run = self.inner.training_runs.fetch_add(1, Ordering::Relaxed);
        let seed = self
            .inner
            .config
            .training_seed
            .map_or_else(|| rand::thread_rng().gen(), |seed| seed.wrapping_add(run));
        ChaCha8Rng::seed_from_u64(seed)
    }
}
