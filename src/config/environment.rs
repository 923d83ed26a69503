// ABOUTME: Environment configuration for the recommendation engine runtime
// ABOUTME: Model store location, profile service, dataset sizes, seeding, and HTTP timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based engine configuration

use pierre_core::constants::dataset::{
    MIN_REAL_TRAINING_EXAMPLES, SYNTHETIC_SAMPLES_MAX, SYNTHETIC_SAMPLES_MIN,
};
use pierre_core::errors::{AppError, AppResult};
use pierre_intelligence::config::{ConfigError, NutritionConfig, TrainingConfig};
use pierre_providers::HttpClientConfig;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Directory holding the persisted model halves
pub const ENV_MODEL_STORE_DIR: &str = "PIERRE_MODEL_STORE_DIR";
/// Base URL of the profile service
pub const ENV_PROFILE_API_URL: &str = "PIERRE_PROFILE_API_URL";
/// Minimum number of valid real records needed to train on real data
pub const ENV_MIN_TRAINING_EXAMPLES: &str = "PIERRE_MIN_TRAINING_EXAMPLES";
/// Lower bound of the synthetic sample count
pub const ENV_SYNTHETIC_SAMPLES_MIN: &str = "PIERRE_SYNTHETIC_SAMPLES_MIN";
/// Upper bound of the synthetic sample count
pub const ENV_SYNTHETIC_SAMPLES_MAX: &str = "PIERRE_SYNTHETIC_SAMPLES_MAX";
/// Whether a synthetic model triggers a background retrain on real data
pub const ENV_BACKGROUND_RETRAIN: &str = "PIERRE_BACKGROUND_RETRAIN";
/// Seed for reproducible training runs
pub const ENV_TRAINING_SEED: &str = "PIERRE_TRAINING_SEED";
/// Profile service request timeout in seconds
pub const ENV_HTTP_TIMEOUT_SECS: &str = "PIERRE_HTTP_TIMEOUT_SECS";
/// Profile service connect timeout in seconds
pub const ENV_HTTP_CONNECT_TIMEOUT_SECS: &str = "PIERRE_HTTP_CONNECT_TIMEOUT_SECS";

/// Runtime configuration of the recommendation engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Directory for the file model store
    pub model_store_dir: PathBuf,
    /// Profile service base URL; `None` means no real training data
    pub profile_api_url: Option<String>,
    /// Valid real records required before training on real data
    pub min_training_examples: usize,
    /// Smallest synthetic set generated on a cold start
    pub synthetic_samples_min: usize,
    /// Largest synthetic set generated on a cold start
    pub synthetic_samples_max: usize,
    /// Retrain a synthetic model with real data in the background after loading it
    pub background_retrain: bool,
    /// Fixed RNG seed for training and synthetic data
    pub training_seed: Option<u64>,
    /// Timeouts for the shared HTTP client
    pub http: HttpClientConfig,
    /// Formula coefficients and rate tables
    pub nutrition: NutritionConfig,
    /// Network hyperparameters
    pub training: TrainingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_store_dir: default_model_store_dir(),
            profile_api_url: None,
            min_training_examples: MIN_REAL_TRAINING_EXAMPLES,
            synthetic_samples_min: SYNTHETIC_SAMPLES_MIN,
            synthetic_samples_max: SYNTHETIC_SAMPLES_MAX,
            background_retrain: true,
            training_seed: None,
            http: HttpClientConfig::default(),
            nutrition: NutritionConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a variable cannot be parsed or the
    /// resulting configuration is inconsistent
    pub fn from_env() -> AppResult<Self> {
        info!("Loading engine configuration from environment variables");
        let defaults = HttpClientConfig::default();

        let config = Self {
            model_store_dir: env::var(ENV_MODEL_STORE_DIR)
                .map_or_else(|_| default_model_store_dir(), PathBuf::from),
            profile_api_url: env::var(ENV_PROFILE_API_URL)
                .ok()
                .map(|url| url.trim().to_owned())
                .filter(|url| !url.is_empty()),
            min_training_examples: parse_env(ENV_MIN_TRAINING_EXAMPLES, MIN_REAL_TRAINING_EXAMPLES)?,
            synthetic_samples_min: parse_env(ENV_SYNTHETIC_SAMPLES_MIN, SYNTHETIC_SAMPLES_MIN)?,
            synthetic_samples_max: parse_env(ENV_SYNTHETIC_SAMPLES_MAX, SYNTHETIC_SAMPLES_MAX)?,
            background_retrain: parse_env(ENV_BACKGROUND_RETRAIN, true)?,
            training_seed: parse_optional_env(ENV_TRAINING_SEED)?,
            http: HttpClientConfig {
                timeout: Duration::from_secs(parse_env(
                    ENV_HTTP_TIMEOUT_SECS,
                    defaults.timeout.as_secs(),
                )?),
                connect_timeout: Duration::from_secs(parse_env(
                    ENV_HTTP_CONNECT_TIMEOUT_SECS,
                    defaults.connect_timeout.as_secs(),
                )?),
            },
            nutrition: NutritionConfig::from_env().map_err(config_error)?,
            training: TrainingConfig::from_env().map_err(config_error)?,
        };
        config.validate()?;

        if config.profile_api_url.is_none() {
            warn!("{ENV_PROFILE_API_URL} not set; models will train on synthetic data only");
        }
        Ok(config)
    }

    /// Check cross-field consistency
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found
    pub fn validate(&self) -> AppResult<()> {
        if self.min_training_examples == 0 {
            return Err(AppError::config(format!(
                "{ENV_MIN_TRAINING_EXAMPLES} must be at least 1"
            )));
        }
        if self.synthetic_samples_min == 0 {
            return Err(AppError::config(format!(
                "{ENV_SYNTHETIC_SAMPLES_MIN} must be at least 1"
            )));
        }
        if self.synthetic_samples_min > self.synthetic_samples_max {
            return Err(AppError::config(format!(
                "{ENV_SYNTHETIC_SAMPLES_MIN} ({}) exceeds {ENV_SYNTHETIC_SAMPLES_MAX} ({})",
                self.synthetic_samples_min, self.synthetic_samples_max
            )));
        }
        if self.http.timeout.is_zero() || self.http.connect_timeout.is_zero() {
            return Err(AppError::config("HTTP timeouts must be non-zero"));
        }
        self.nutrition.validate().map_err(config_error)?;
        self.training.validate().map_err(config_error)
    }
}

fn default_model_store_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("pierre")
        .join("models")
}

fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_optional_env(key).map(|value| value.unwrap_or(default))
}

fn parse_optional_env<T>(key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(None),
    }
}

fn config_error(error: ConfigError) -> AppError {
    AppError::config(error.to_string())
}
