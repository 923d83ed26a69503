// ABOUTME: Turns a validated profile and an optional model prediction into a recommendation
// ABOUTME: Goal direction, weekly rate lookup, backup fallback, safety clamp, and macro split
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::NutritionConfig;
use crate::macro_split;
use crate::nutrition_calculator::{
    calculate_backup_calories, clamp_recommended_calories, minimum_safe_calories,
};
use pierre_core::errors::RecommendationError;
use pierre_core::models::{CalorieSource, FeatureVector, GoalDirection, Recommendation, UserProfile};
use tracing::debug;

/// Everything needed to produce a recommendation for one profile, computed
/// before the model is consulted
#[derive(Debug, Clone, PartialEq)]
pub struct CaloriePlan {
    profile: UserProfile,
    direction: GoalDirection,
    target_rate: f64,
    features: FeatureVector,
}

impl CaloriePlan {
    /// Plan a profile; `None` when the profile has no weight goal
    #[must_use]
    pub fn for_profile(profile: &UserProfile, config: &NutritionConfig) -> Option<Self> {
        let goal = profile.weight_goal_kg?;
        let direction = GoalDirection::between(profile.weight_kg, goal);
        let target_rate = config.rates.weekly_rate(profile.activity_level, direction);
        Some(Self {
            profile: *profile,
            direction,
            target_rate,
            features: FeatureVector::from_profile(profile, goal, target_rate),
        })
    }

    /// Model input for this profile
    #[must_use]
    pub const fn features(&self) -> &FeatureVector {
        &self.features
    }

    /// Weekly rate in kg used for the adjustment
    #[must_use]
    pub const fn target_rate(&self) -> f64 {
        self.target_rate
    }

    /// Loss, gain, or maintenance
    #[must_use]
    pub const fn direction(&self) -> GoalDirection {
        self.direction
    }

    /// Deterministic formula result before clamping
    #[must_use]
    pub fn backup_calories(&self, config: &NutritionConfig) -> u32 {
        calculate_backup_calories(&self.profile, self.target_rate, config)
    }

    /// Build the recommendation from the model outcome.
    ///
    /// Any prediction error substitutes the backup formula. The result is
    /// clamped to the profile's safety floor and the 4000 kcal ceiling before
    /// macros are derived.
    #[must_use]
    pub fn finish(
        &self,
        prediction: Result<f64, RecommendationError>,
        is_real_data_model: bool,
        config: &NutritionConfig,
    ) -> Recommendation {
        let (raw, source) = match prediction {
            Ok(kcal) => (kcal, CalorieSource::Model),
            Err(error) => {
                debug!(%error, "using backup formula");
                (
                    f64::from(self.backup_calories(config)),
                    CalorieSource::BackupFormula,
                )
            }
        };
        let floor = minimum_safe_calories(&self.profile, config);
        let calories = clamp_recommended_calories(raw, floor);
        Recommendation {
            calories,
            macros: macro_split::split(calories, &self.profile, self.direction.is_loss()),
            target_rate: self.target_rate,
            is_real_data_model,
            source,
        }
    }
}

/// Recommendation from the backup formula alone; `None` without a weight goal
#[must_use]
pub fn backup_recommendation(
    profile: &UserProfile,
    config: &NutritionConfig,
) -> Option<Recommendation> {
    CaloriePlan::for_profile(profile, config)
        .map(|plan| plan.finish(Err(RecommendationError::ModelNotReady), false, config))
}
