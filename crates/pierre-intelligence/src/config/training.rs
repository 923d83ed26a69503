// ABOUTME: Training hyperparameters for the calorie regression network
// ABOUTME: Epochs, batch size, Adam learning rate, with environment overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable overriding the epoch count
pub const ENV_TRAINING_EPOCHS: &str = "PIERRE_TRAINING_EPOCHS";
/// Environment variable overriding the Adam learning rate
pub const ENV_LEARNING_RATE: &str = "PIERRE_LEARNING_RATE";

/// Hyperparameters for one training run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingConfig {
    /// Full passes over the dataset
    pub epochs: usize,
    /// Samples per gradient step
    pub batch_size: usize,
    /// Adam step size
    pub learning_rate: f64,
    /// Adam first-moment decay
    pub beta1: f64,
    /// Adam second-moment decay
    pub beta2: f64,
    /// Adam numerical stabilizer
    pub epsilon: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 30,
            batch_size: 16,
            learning_rate: 0.01,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
        }
    }
}

impl TrainingConfig {
    /// Defaults with environment overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed or fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = env::var(ENV_TRAINING_EPOCHS) {
            config.epochs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("{ENV_TRAINING_EPOCHS}='{raw}'")))?;
        }
        if let Ok(raw) = env::var(ENV_LEARNING_RATE) {
            config.learning_rate = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("{ENV_LEARNING_RATE}='{raw}'")))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate hyperparameters
    ///
    /// # Errors
    ///
    /// Returns an error if any value is zero or out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epochs == 0 {
            return Err(ConfigError::InvalidRange("epochs must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidRange("batch size must be at least 1"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate < 1.0) {
            return Err(ConfigError::InvalidRange(
                "learning rate must be in (0, 1)",
            ));
        }
        if !(0.0..1.0).contains(&self.beta1) || !(0.0..1.0).contains(&self.beta2) {
            return Err(ConfigError::InvalidRange("Adam betas must be in [0, 1)"));
        }
        Ok(())
    }
}
