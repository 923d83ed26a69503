// ABOUTME: Configuration module for pierre-intelligence crate
// ABOUTME: Re-exports nutrition and training configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Configuration error types
pub mod error;
/// BMR coefficients, activity factors, rate tables, and safety floors
pub mod nutrition;
/// Regression training hyperparameters
pub mod training;

pub use error::ConfigError;
pub use nutrition::{
    ActivityFactorsConfig, BmrConfig, NutritionConfig, RateTablesConfig, SafetyFloorConfig,
    WeeklyRateTable,
};
pub use training::TrainingConfig;
