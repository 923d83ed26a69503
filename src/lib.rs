// ABOUTME: Main library entry point for the Pierre calorie recommendation engine
// ABOUTME: Wires model storage, persistence, the engine lifecycle, and the reactive feed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Calorie Engine
//!
//! Daily calorie and macro recommendations from a small regression model,
//! with a deterministic Harris-Benedict backup so a valid profile always gets
//! a usable number.
//!
//! ## Architecture
//!
//! - **`pierre_core`**: errors, domain models, constants
//! - **`pierre_intelligence`**: formulas, normalization, synthetic data, the network
//! - **`pierre_providers`**: the profile data source
//! - **this crate**: model storage, persistence, the engine, the feed, the CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_calorie_engine::config::EngineConfig;
//! use pierre_calorie_engine::engine::RecommendationEngine;
//! use pierre_core::errors::AppResult;
//! use pierre_core::models::ProfileRecord;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let engine = RecommendationEngine::from_config(EngineConfig::from_env()?)?;
//!     let profile = ProfileRecord {
//!         age: Some(30.0),
//!         height: Some(180.0),
//!         weight: Some(90.0),
//!         sex: Some("male".into()),
//!         activity_level: Some("moderate".into()),
//!         weight_goal: Some(80.0),
//!     };
//!     if let Some(recommendation) = engine.recommend(&profile).await? {
//!         println!("{} kcal", recommendation.calories);
//!     }
//!     Ok(())
//! }
//! ```

/// Engine configuration from environment variables
pub mod config;

/// Production logging and structured output
pub mod logging;

/// Key-value blob storage for persisted models
pub mod model_store;

/// Paired save/load of model weights and normalization bounds
pub mod persistence;

/// Recommendation engine lifecycle and prediction
pub mod engine;

/// Last-profile-wins reactive recommendation feed
pub mod feed;

pub use engine::{EngineState, ModelProvenance, RecommendationEngine, RetrainReport, TrainingMode};
pub use feed::{RecommendationFeed, RecommendationView, Recommender};
