// ABOUTME: Saves and loads the trained calorie model as a paired weights/normalization unit
// ABOUTME: A failed load clears both keys so the next attempt starts from a clean store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Model persistence.
//!
//! The weights and the normalization bounds are stored under two fixed keys
//! and are only meaningful together. Writers always write both; readers
//! accept only a matching pair and otherwise delete whatever is there.

use crate::model_store::{ModelStore, StoreError};
use pierre_core::constants::storage_keys::{MODEL_NORMALIZATION_KEY, MODEL_WEIGHTS_KEY};
use pierre_core::errors::{AppError, RecommendationError};
use pierre_intelligence::regression::{BoundsSnapshot, CalorieRegressor, ModelSnapshot};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure while saving a model
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The model has nothing to save
    #[error(transparent)]
    Model(#[from] RecommendationError),

    /// A snapshot could not be encoded
    #[error("Failed to encode model snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// The store rejected a write
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PersistenceError> for AppError {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::Model(e) => e.into(),
            PersistenceError::Encode(e) => e.into(),
            PersistenceError::Store(e) => e.into(),
        }
    }
}

/// Write both halves of a trained model.
///
/// If the normalization write fails after the weights were written, both
/// keys are deleted so neither a half-pair nor new weights next to the bounds
/// of an earlier model are left behind.
///
/// # Errors
///
/// Returns an error if the model is untrained, encoding fails, or the store
/// rejects a write
pub async fn save_model(
    store: &dyn ModelStore,
    model: &CalorieRegressor,
) -> Result<(), PersistenceError> {
    let (weights, bounds) = model.to_snapshots()?;
    let weights = serde_json::to_vec(&weights)?;
    let bounds = serde_json::to_vec(&bounds)?;

    store.put(MODEL_WEIGHTS_KEY, &weights).await?;
    if let Err(e) = store.put(MODEL_NORMALIZATION_KEY, &bounds).await {
        warn!(error = %e, "normalization write failed, clearing both keys");
        if let Err(cleanup) = clear_model(store).await {
            warn!(error = %cleanup, "failed to clear partially saved model");
        }
        return Err(e.into());
    }
    info!(
        weights_bytes = weights.len(),
        bounds_bytes = bounds.len(),
        is_using_real_data = model.is_using_real_data(),
        "calorie model saved"
    );
    Ok(())
}

/// Load a model, requiring both halves to be present, parseable, and matching.
///
/// On any failure both keys are deleted before the error is returned.
///
/// # Errors
///
/// Returns `ModelLoad` describing why the persisted state was rejected
pub async fn load_model(store: &dyn ModelStore) -> Result<CalorieRegressor, RecommendationError> {
    match read_pair(store).await {
        Ok(model) => {
            info!(
                is_using_real_data = model.is_using_real_data(),
                trained_at = ?model.trained_at(),
                "calorie model loaded"
            );
            Ok(model)
        }
        Err(reason) => {
            debug!(%reason, "persisted model rejected, clearing both keys");
            if let Err(e) = clear_model(store).await {
                warn!(error = %e, "failed to clear rejected model state");
            }
            Err(RecommendationError::ModelLoad { reason })
        }
    }
}

/// Delete both halves; succeeds when nothing is stored
///
/// # Errors
///
/// Returns the first store error; the second key is still attempted
pub async fn clear_model(store: &dyn ModelStore) -> Result<(), StoreError> {
    let weights = store.delete(MODEL_WEIGHTS_KEY).await;
    let bounds = store.delete(MODEL_NORMALIZATION_KEY).await;
    weights.and(bounds)
}

async fn read_pair(store: &dyn ModelStore) -> Result<CalorieRegressor, String> {
    let weights: ModelSnapshot = read_half(store, MODEL_WEIGHTS_KEY).await?;
    let bounds: BoundsSnapshot = read_half(store, MODEL_NORMALIZATION_KEY).await?;
    CalorieRegressor::from_snapshots(&weights, &bounds).map_err(|e| e.to_string())
}

async fn read_half<T: DeserializeOwned>(store: &dyn ModelStore, key: &str) -> Result<T, String> {
    let bytes = store
        .get(key)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{key} is missing"))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("{key} is malformed: {e}"))
}
