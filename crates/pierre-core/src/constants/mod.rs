// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for the Pierre calorie recommendation engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in a single large file.

/// Nutrition, energy balance, and dataset constants
pub mod nutrition;

pub use nutrition::{calorie_limits, dataset, energy, macros, profile_limits};

/// Storage keys for the persisted model pair
pub mod storage_keys {
    /// Serialized network topology and weights
    pub const MODEL_WEIGHTS_KEY: &str = "calorie-model.weights";
    /// Serialized normalization bounds and provenance flag
    pub const MODEL_NORMALIZATION_KEY: &str = "calorie-model.normalization";
}

/// Service identity used in logs
pub mod service_names {
    /// Calorie engine service name
    pub const PIERRE_CALORIE_ENGINE: &str = "pierre-calorie-engine";
}
