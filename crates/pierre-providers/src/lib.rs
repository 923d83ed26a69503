// ABOUTME: Profile data sources for the Pierre calorie recommendation engine
// ABOUTME: ProfileDataSource trait, HTTP and static implementations, shared HTTP client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Profile data sources and HTTP plumbing.
//!
//! The engine consumes profile data only through [`ProfileDataSource`]; the
//! HTTP service and the static in-memory source are interchangeable.

/// Provider error types
pub mod errors;
/// Shared HTTP client for profile service calls
pub mod http_client;
/// Profile data source trait and implementations
pub mod profile_source;

pub use errors::{ProviderError, ProviderResult};
pub use http_client::{initialize_shared_client, shared_client, HttpClientConfig};
pub use profile_source::{
    decode_training_records, HttpProfileSource, ProfileDataSource, StaticProfileSource,
    PROFILE_API_NAME,
};
