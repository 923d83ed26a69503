// ABOUTME: Core data models for the Pierre calorie recommendation engine
// ABOUTME: Re-exports profile, training, and recommendation types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - **Boundary types** (`ProfileRecord`, `TrainingRecord`) mirror the JSON the
//!   profile service emits; every field is optional.
//! - **Validated types** (`UserProfile`, `TrainingExample`) are only built
//!   through fallible conversions, so numeric code never sees missing data.
//! - **Outputs** (`Recommendation`, `MacroBreakdown`) are what callers render.

mod profile;
mod recommendation;
mod training;

pub use profile::{ActivityLevel, GoalDirection, ProfileRecord, Sex, UserProfile};
pub use recommendation::{CalorieSource, MacroBreakdown, MacroTarget, Recommendation};
pub use training::{FeatureVector, TrainingExample, TrainingRecord, TrainingSet};
