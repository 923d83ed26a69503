// ABOUTME: Calorie recommendation algorithms for the Pierre platform
// ABOUTME: Backup formulas, macro split, normalization, synthetic data, and the regression model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Intelligence
//!
//! Pure, synchronous algorithms behind the calorie recommendation engine.
//! Nothing in this crate performs I/O; the orchestrator in the main crate
//! owns storage, profile fetching, and scheduling.
//!
//! ## Modules
//!
//! - **config**: BMR coefficients, activity factors, rate tables, training hyperparameters
//! - **nutrition_calculator**: Harris-Benedict backup formula and safety floors
//! - **macro_split**: Goal- and activity-based protein/carb/fat split
//! - **normalizer**: Min-max scaling of features and labels
//! - **synthetic_data**: Formula-driven training examples for cold starts
//! - **training_data**: Conversion of real profile history into training sets
//! - **regression**: The 7-16-8-1 dense network and its persisted snapshots
//! - **recommendation_planner**: Fallback, clamping, and macro derivation for one profile

/// Nutrition and training configuration
pub mod config;

/// BMR, TDEE, backup formula, and safety floor calculations
pub mod nutrition_calculator;

/// Macronutrient distribution
pub mod macro_split;

/// Min-max normalization
pub mod normalizer;

/// Synthetic training data generator
pub mod synthetic_data;

/// Real training record conversion
pub mod training_data;

/// Neural calorie regression
pub mod regression;

/// Per-profile recommendation assembly
pub mod recommendation_planner;

pub use config::{ConfigError, NutritionConfig, RateTablesConfig, TrainingConfig};
pub use normalizer::NormalizationBounds;
pub use recommendation_planner::{backup_recommendation, CaloriePlan};
pub use regression::{BoundsSnapshot, CalorieRegressor, ModelSnapshot, TrainingSummary};
