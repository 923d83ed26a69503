// ABOUTME: Configuration module for the calorie recommendation engine
// ABOUTME: Environment-only configuration; algorithm settings come from pierre-intelligence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the calorie engine.
//!
//! Everything is read from environment variables. Nutrition tables and
//! training hyperparameters live in `pierre_intelligence::config` and are
//! embedded in [`EngineConfig`].

/// Engine configuration from environment variables
pub mod environment;

pub use environment::EngineConfig;
