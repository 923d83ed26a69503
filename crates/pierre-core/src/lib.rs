// ABOUTME: Core types and constants for the Pierre calorie recommendation engine
// ABOUTME: Foundation crate with error types, domain models, and nutrition constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Core
//!
//! Foundation crate providing shared types and constants for the Pierre
//! calorie recommendation engine. It changes infrequently, which keeps
//! incremental rebuilds of the algorithm and provider crates cheap.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the `RecommendationError` taxonomy
//! - **constants**: Energy balance, macro, and dataset constants
//! - **models**: Profiles, training records, and recommendation outputs

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (profiles, training data, recommendations)
pub mod models;
