// ABOUTME: Calorie regressor wrapping the dense network with its normalization bounds
// ABOUTME: Idempotent creation, training from a TrainingSet, sane-range prediction, snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::network::{Network, NetworkSnapshot};
use crate::config::TrainingConfig;
use crate::normalizer::NormalizationBounds;
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use pierre_core::constants::calorie_limits::{
    SANE_PREDICTION_MAX_KCAL, SANE_PREDICTION_MIN_KCAL,
};
use pierre_core::constants::dataset::FEATURE_COUNT;
use pierre_core::errors::RecommendationError;
use pierre_core::models::{FeatureVector, TrainingSet};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Layer widths: 7 features, hidden 16 and 8, one calorie output
pub const TOPOLOGY: [usize; 4] = [FEATURE_COUNT, 16, 8, 1];

/// Version written into both persisted snapshots
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Result of a completed training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Epochs run
    pub epochs: usize,
    /// Rows trained on
    pub samples: usize,
    /// Normalized MSE after the last epoch
    pub final_loss: Option<f64>,
    /// Whether the rows came from real user history
    pub is_using_real_data: bool,
    /// Features that were constant across the set
    pub degenerate_features: Vec<usize>,
}

/// Persisted weights half
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSnapshot {
    /// Snapshot format
    pub format_version: u32,
    /// Identifier shared with the matching [`BoundsSnapshot`]
    pub model_id: Uuid,
    /// When training finished
    pub trained_at: DateTime<Utc>,
    /// Dense layer weights
    pub network: NetworkSnapshot,
}

/// Persisted normalization half
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsSnapshot {
    /// Snapshot format
    pub format_version: u32,
    /// Identifier shared with the matching [`ModelSnapshot`]
    pub model_id: Uuid,
    /// Whether the model was trained on real user history
    pub is_using_real_data: bool,
    /// Input and label bounds
    pub bounds: NormalizationBounds,
}

/// Neural calorie predictor.
///
/// A model is usable only once both the network and the bounds of the set it
/// was trained on are present.
#[derive(Debug, Clone, Default)]
pub struct CalorieRegressor {
    network: Option<Network>,
    bounds: Option<NormalizationBounds>,
    is_using_real_data: bool,
    model_id: Option<Uuid>,
    trained_at: Option<DateTime<Utc>>,
}

impl CalorieRegressor {
    /// Empty, untrained regressor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the network if it does not exist yet; an existing network is kept
    pub fn create<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Network {
        self.network
            .get_or_insert_with(|| Network::new(&TOPOLOGY, rng))
    }

    /// Whether both weights and bounds are present
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.network.is_some() && self.bounds.is_some()
    }

    /// Whether the current weights came from real user history
    #[must_use]
    pub const fn is_using_real_data(&self) -> bool {
        self.is_using_real_data
    }

    /// Normalization bounds of the last training set
    #[must_use]
    pub const fn bounds(&self) -> Option<&NormalizationBounds> {
        self.bounds.as_ref()
    }

    /// When the current weights finished training
    #[must_use]
    pub const fn trained_at(&self) -> Option<DateTime<Utc>> {
        self.trained_at
    }

    /// Fit the network to a dataset, replacing the bounds with the set's own.
    ///
    /// Fitting runs on a copy of the current weights. The regressor is only
    /// updated once the fit has produced a finite loss, so a failed run leaves
    /// the previous weights and bounds in place.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if the set is empty or its columns differ in
    /// length, and `Training` if the loss diverges
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        set: &TrainingSet,
        is_using_real_data: bool,
        config: &TrainingConfig,
        rng: &mut R,
    ) -> Result<TrainingSummary, RecommendationError> {
        let bounds = NormalizationBounds::from_dataset(&set.inputs, &set.outputs)?;
        let rows = bounds.normalize_dataset(&set.inputs);
        let labels: Array1<f64> = set
            .outputs
            .iter()
            .map(|&kcal| bounds.normalize_label(kcal))
            .collect();
        let inputs = Array2::from_shape_vec(
            (rows.len(), FEATURE_COUNT),
            rows.into_iter().flatten().collect(),
        )
        .map_err(|e| RecommendationError::Training {
            reason: e.to_string(),
        })?;

        debug!(
            samples = set.len(),
            epochs = config.epochs,
            is_using_real_data,
            "fitting calorie regressor"
        );
        let mut network = match &self.network {
            Some(current) => current.clone(),
            None => Network::new(&TOPOLOGY, rng),
        };
        let report = network.fit(&inputs, &labels, config, rng);

        let summary = TrainingSummary {
            epochs: config.epochs,
            samples: set.len(),
            final_loss: report.final_loss(),
            is_using_real_data,
            degenerate_features: bounds.degenerate_features(),
        };
        if summary.final_loss.is_some_and(|loss| !loss.is_finite()) {
            return Err(RecommendationError::Training {
                reason: "loss diverged".to_owned(),
            });
        }

        self.network = Some(network);
        self.bounds = Some(bounds);
        self.is_using_real_data = is_using_real_data;
        self.model_id = Some(Uuid::new_v4());
        self.trained_at = Some(Utc::now());
        info!(
            samples = summary.samples,
            final_loss = ?summary.final_loss,
            is_using_real_data,
            "calorie regressor trained"
        );
        Ok(summary)
    }

    /// Predict daily calories for one feature vector
    ///
    /// # Errors
    ///
    /// Returns `ModelNotReady` without weights or bounds, and
    /// `PredictionOutOfRange` when the output falls outside 800-5000 kcal
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, RecommendationError> {
        let (Some(network), Some(bounds)) = (&self.network, &self.bounds) else {
            return Err(RecommendationError::ModelNotReady);
        };
        let scaled = bounds.normalize_features(features);
        let raw = network
            .predict_one(&scaled)
            .ok_or(RecommendationError::ModelNotReady)?;
        let calories = bounds.denormalize_label(raw);
        let sane = SANE_PREDICTION_MIN_KCAL..=SANE_PREDICTION_MAX_KCAL;
        if !calories.is_finite() || !sane.contains(&calories) {
            return Err(RecommendationError::PredictionOutOfRange { value: calories });
        }
        Ok(calories)
    }

    /// Split the trained model into its two persisted halves
    ///
    /// # Errors
    ///
    /// Returns `ModelNotReady` if the model has not been trained or loaded
    pub fn to_snapshots(&self) -> Result<(ModelSnapshot, BoundsSnapshot), RecommendationError> {
        let (Some(network), Some(bounds)) = (&self.network, &self.bounds) else {
            return Err(RecommendationError::ModelNotReady);
        };
        let model_id = self.model_id.unwrap_or_else(Uuid::new_v4);
        Ok((
            ModelSnapshot {
                format_version: SNAPSHOT_FORMAT_VERSION,
                model_id,
                trained_at: self.trained_at.unwrap_or_else(Utc::now),
                network: network.snapshot(),
            },
            BoundsSnapshot {
                format_version: SNAPSHOT_FORMAT_VERSION,
                model_id,
                is_using_real_data: self.is_using_real_data,
                bounds: bounds.clone(),
            },
        ))
    }

    /// Rebuild a model from its two halves
    ///
    /// # Errors
    ///
    /// Returns `ModelLoad` if the halves disagree in version or identity, the
    /// topology differs from [`TOPOLOGY`], or the bounds are malformed
    pub fn from_snapshots(
        model: &ModelSnapshot,
        bounds: &BoundsSnapshot,
    ) -> Result<Self, RecommendationError> {
        if model.format_version != SNAPSHOT_FORMAT_VERSION
            || bounds.format_version != SNAPSHOT_FORMAT_VERSION
        {
            return Err(load_error(format!(
                "unsupported snapshot version {}/{}",
                model.format_version, bounds.format_version
            )));
        }
        if model.model_id != bounds.model_id {
            return Err(load_error(
                "weights and normalization belong to different models".to_owned(),
            ));
        }
        let network = Network::from_snapshot(&model.network).map_err(load_error)?;
        if network.topology() != TOPOLOGY {
            return Err(load_error(format!(
                "topology {:?} does not match {TOPOLOGY:?}",
                network.topology()
            )));
        }
        bounds.bounds.validate()?;

        Ok(Self {
            network: Some(network),
            bounds: Some(bounds.bounds.clone()),
            is_using_real_data: bounds.is_using_real_data,
            model_id: Some(model.model_id),
            trained_at: Some(model.trained_at),
        })
    }
}

fn load_error(reason: String) -> RecommendationError {
    RecommendationError::ModelLoad { reason }
}
