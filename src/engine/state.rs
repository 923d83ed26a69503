// ABOUTME: Observable lifecycle state of the recommendation engine
// ABOUTME: Phases, model provenance, and the in-flight prediction counter guard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Where the calorie numbers currently come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelProvenance {
    /// Model trained on real user history
    RealData,
    /// Model trained on formula-generated examples
    SyntheticData,
    /// No usable model; every prediction uses the backup formula
    BackupFormula,
}

impl ModelProvenance {
    /// Provenance of a trained model
    #[must_use]
    pub const fn of_model(is_using_real_data: bool) -> Self {
        if is_using_real_data {
            Self::RealData
        } else {
            Self::SyntheticData
        }
    }
}

/// Externally visible engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "provenance")]
pub enum EngineState {
    /// Nothing loaded or trained yet
    Uninitialized,
    /// Loading or training the first model
    Initializing,
    /// Serving recommendations
    Ready(ModelProvenance),
    /// At least one prediction is running
    Predicting,
    /// Initialization failed; about to fall back to the backup formula
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Uninitialized,
    Initializing,
    Ready(ModelProvenance),
    Error,
}

/// Internal lifecycle record shared through a watch channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lifecycle {
    pub(crate) phase: Phase,
    pub(crate) in_flight: usize,
    pub(crate) last_error: Option<String>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
            in_flight: 0,
            last_error: None,
        }
    }
}

impl Lifecycle {
    pub(crate) const fn state(&self) -> EngineState {
        match self.phase {
            Phase::Uninitialized => EngineState::Uninitialized,
            Phase::Initializing => EngineState::Initializing,
            Phase::Error => EngineState::Error,
            Phase::Ready(_) if self.in_flight > 0 => EngineState::Predicting,
            Phase::Ready(provenance) => EngineState::Ready(provenance),
        }
    }
}

/// Marks one prediction as in flight until dropped
pub(crate) struct PredictionGuard<'a> {
    lifecycle: &'a watch::Sender<Lifecycle>,
}

impl<'a> PredictionGuard<'a> {
    pub(crate) fn enter(lifecycle: &'a watch::Sender<Lifecycle>) -> Self {
        lifecycle.send_modify(|l| l.in_flight += 1);
        Self { lifecycle }
    }
}

impl Drop for PredictionGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle
            .send_modify(|l| l.in_flight = l.in_flight.saturating_sub(1));
    }
}
