// ABOUTME: Output models for calorie recommendations and macro breakdowns
// ABOUTME: Recommendation, MacroBreakdown, MacroTarget, and CalorieSource definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Gram target and share of calories for one macronutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTarget {
    /// Daily grams
    pub grams: u32,
    /// Share of daily calories (0-100)
    pub percentage: u8,
}

/// Daily protein/carbohydrate/fat targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    /// Protein target
    pub protein: MacroTarget,
    /// Carbohydrate target
    pub carbs: MacroTarget,
    /// Fat target
    pub fat: MacroTarget,
}

impl MacroBreakdown {
    /// Sum of the three percentages
    #[must_use]
    pub fn total_percentage(&self) -> u16 {
        u16::from(self.protein.percentage)
            + u16::from(self.carbs.percentage)
            + u16::from(self.fat.percentage)
    }
}

/// Which path produced the calorie number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieSource {
    /// Trained regression model
    Model,
    /// Deterministic Harris-Benedict backup formula
    BackupFormula,
}

/// Daily calorie and macro recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Daily calories after safety clamping
    pub calories: u32,
    /// Macro targets derived from `calories`
    pub macros: MacroBreakdown,
    /// Weekly weight change rate in kg used for the adjustment
    pub target_rate: f64,
    /// Whether the model in memory was trained on real user data
    pub is_real_data_model: bool,
    /// Which path produced the calorie number
    pub source: CalorieSource,
}
