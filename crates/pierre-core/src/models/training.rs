// ABOUTME: Training data models for the calorie regression model
// ABOUTME: Fixed-width feature vectors, raw training records, and labeled examples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::profile::{ProfileRecord, UserProfile};
use crate::constants::dataset::FEATURE_COUNT;
use crate::errors::RecommendationError;
use serde::{Deserialize, Serialize};

/// Model input in fixed order:
/// `[age, height, weight, sexCode, activityCode, weightGoal, targetRate]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Index of the age feature
    pub const AGE: usize = 0;
    /// Index of the height feature
    pub const HEIGHT: usize = 1;
    /// Index of the weight feature
    pub const WEIGHT: usize = 2;
    /// Index of the sex code feature
    pub const SEX: usize = 3;
    /// Index of the activity code feature
    pub const ACTIVITY: usize = 4;
    /// Index of the goal weight feature
    pub const WEIGHT_GOAL: usize = 5;
    /// Index of the weekly target rate feature
    pub const TARGET_RATE: usize = 6;

    /// Assemble the features for a profile and its weekly target rate
    #[must_use]
    pub fn from_profile(profile: &UserProfile, weight_goal_kg: f64, target_rate: f64) -> Self {
        Self([
            f64::from(profile.age),
            profile.height_cm,
            profile.weight_kg,
            profile.sex.code(),
            f64::from(profile.activity_level.code()),
            weight_goal_kg,
            target_rate,
        ])
    }

    /// Features as a slice
    #[must_use]
    pub const fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Historical profile with an observed daily intake, as served by the
/// profile service's bulk endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    /// Profile fields
    #[serde(flatten)]
    pub profile: ProfileRecord,
    /// Observed daily calorie intake
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_intake: Option<f64>,
}

impl TrainingRecord {
    /// Validate the record into a profile with a goal and a positive label
    ///
    /// # Errors
    ///
    /// Returns the profile validation error, or `IncompleteProfile` when the
    /// goal or the calorie intake is missing
    pub fn validated(&self) -> Result<(UserProfile, f64, f64), RecommendationError> {
        let profile = UserProfile::try_from(&self.profile)?;
        let goal = profile
            .weight_goal_kg
            .ok_or(RecommendationError::IncompleteProfile {
                field: "weightGoal",
            })?;
        match self.calorie_intake {
            Some(kcal) if kcal.is_finite() && kcal > 0.0 => Ok((profile, goal, kcal)),
            Some(_) => Err(RecommendationError::InvalidProfile {
                field: "calorieIntake",
                reason: "must be a positive number".to_owned(),
            }),
            None => Err(RecommendationError::IncompleteProfile {
                field: "calorieIntake",
            }),
        }
    }
}

/// Labeled example ready for normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingExample {
    /// Model input
    pub features: FeatureVector,
    /// Observed daily calories
    pub calories: f64,
}

/// Column-oriented dataset handed to the trainer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    /// Feature rows
    pub inputs: Vec<FeatureVector>,
    /// Labels aligned with `inputs`
    pub outputs: Vec<f64>,
}

impl TrainingSet {
    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the set has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl FromIterator<TrainingExample> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = TrainingExample>>(iter: I) -> Self {
        let (inputs, outputs) = iter
            .into_iter()
            .map(|example| (example.features, example.calories))
            .unzip();
        Self { inputs, outputs }
    }
}
