// ABOUTME: Neural calorie regression: dense network and the regressor built on it
// ABOUTME: Re-exports the model, snapshots, and training summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// ndarray dense network with Adam
pub mod network;
/// Calorie regressor and persisted snapshots
pub mod model;

pub use model::{
    BoundsSnapshot, CalorieRegressor, ModelSnapshot, TrainingSummary, SNAPSHOT_FORMAT_VERSION,
    TOPOLOGY,
};
pub use network::{Activation, FitReport, Network, NetworkSnapshot};
