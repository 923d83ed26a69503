// ABOUTME: Deterministic calorie formulas used as the backup to the regression model
// ABOUTME: Harris-Benedict BMR, TDEE, weekly-rate adjustment, and minimum safe floors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition Calculator Module
//!
//! Pure functions with no model dependency. Given the same profile and
//! target rate they always return the same number, which is what lets the
//! engine fall back to them on any model failure.
//!
//! # Scientific References
//!
//! - Roza, A.M., & Shizgal, H.M. (1984). The Harris Benedict equation reevaluated.
//!   *American Journal of Clinical Nutrition*, 40(1), 168-182.
//!   <https://doi.org/10.1093/ajcn/40.1.168>
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use crate::config::{ActivityFactorsConfig, BmrConfig, NutritionConfig};
use pierre_core::constants::calorie_limits::{
    FEMALE_FLOOR_KCAL, MALE_FLOOR_KCAL, MAX_RECOMMENDED_KCAL,
};
use pierre_core::constants::energy::{DAYS_PER_WEEK, KCAL_PER_KG_BODY_MASS};
use pierre_core::models::{ActivityLevel, GoalDirection, Sex, UserProfile};

/// Calculate Basal Metabolic Rate using the revised Harris-Benedict equation
///
/// - Men: `88.362 + 13.397 x weight + 4.799 x height - 5.677 x age`
/// - Women: `447.593 + 9.247 x weight + 3.098 x height - 4.330 x age`
#[must_use]
pub fn calculate_harris_benedict(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: Sex,
    config: &BmrConfig,
) -> f64 {
    let age = f64::from(age);
    match sex {
        Sex::Male => {
            config.hb_male_age_coef.mul_add(
                -age,
                config.hb_male_height_coef.mul_add(
                    height_cm,
                    config
                        .hb_male_weight_coef
                        .mul_add(weight_kg, config.hb_male_constant),
                ),
            )
        }
        Sex::Female => {
            config.hb_female_age_coef.mul_add(
                -age,
                config.hb_female_height_coef.mul_add(
                    height_cm,
                    config
                        .hb_female_weight_coef
                        .mul_add(weight_kg, config.hb_female_constant),
                ),
            )
        }
    }
}

/// Calculate resting energy with the Mifflin-St Jeor equation (1990)
///
/// Formula: `10 x weight + 6.25 x height - 5 x age + (5 | -161)`
#[must_use]
pub fn calculate_mifflin_st_jeor(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: Sex,
    config: &BmrConfig,
) -> f64 {
    let sex_constant = match sex {
        Sex::Male => config.msj_male_constant,
        Sex::Female => config.msj_female_constant,
    };
    config.msj_age_coef.mul_add(
        -f64::from(age),
        config
            .msj_height_coef
            .mul_add(height_cm, config.msj_weight_coef.mul_add(weight_kg, sex_constant)),
    )
}

/// Calculate Total Daily Energy Expenditure: `BMR x activity factor`
#[must_use]
pub fn calculate_tdee(bmr: f64, level: ActivityLevel, config: &ActivityFactorsConfig) -> f64 {
    bmr * config.factor(level)
}

/// Signed daily calorie change for a weekly rate: `rate x 7700 / 7`,
/// negative for loss, positive for gain, zero for maintenance
#[must_use]
pub fn daily_calorie_adjustment(weekly_rate_kg: f64, direction: GoalDirection) -> f64 {
    let magnitude = weekly_rate_kg * KCAL_PER_KG_BODY_MASS / DAYS_PER_WEEK;
    match direction {
        GoalDirection::Loss => -magnitude,
        GoalDirection::Gain => magnitude,
        GoalDirection::Maintain => 0.0,
    }
}

/// Backup daily calorie target: Harris-Benedict TDEE adjusted by the weekly rate.
///
/// A profile without a goal is treated as maintenance.
#[must_use]
pub fn calculate_backup_calories(
    profile: &UserProfile,
    target_rate: f64,
    config: &NutritionConfig,
) -> u32 {
    let bmr = calculate_harris_benedict(
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.sex,
        &config.bmr,
    );
    let tdee = calculate_tdee(bmr, profile.activity_level, &config.activity_factors);
    let direction = profile
        .goal_direction()
        .unwrap_or(GoalDirection::Maintain);
    let target = tdee + daily_calorie_adjustment(target_rate, direction);
    target.round().max(0.0) as u32
}

/// Lowest calorie target the engine will recommend for a profile.
///
/// `max(1500, MSJ)` for men and `max(1200, MSJ)` for women, scaled by the
/// activity multiplier and capped at the recommendation ceiling.
#[must_use]
pub fn minimum_safe_calories(profile: &UserProfile, config: &NutritionConfig) -> f64 {
    let resting = calculate_mifflin_st_jeor(
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.sex,
        &config.bmr,
    );
    let absolute_floor = match profile.sex {
        Sex::Male => MALE_FLOOR_KCAL,
        Sex::Female => FEMALE_FLOOR_KCAL,
    };
    let floor = resting.max(absolute_floor) * config.safety_floor.multiplier(profile.activity_level);
    floor.min(MAX_RECOMMENDED_KCAL)
}

/// Round to whole calories and clamp into `[floor, 4000]`.
///
/// The lower bound is the floor rounded up, so the result never drops below
/// a fractional floor.
#[must_use]
pub fn clamp_recommended_calories(calories: f64, floor: f64) -> u32 {
    let lower = floor.ceil().min(MAX_RECOMMENDED_KCAL);
    calories.round().max(lower).min(MAX_RECOMMENDED_KCAL) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sex: Sex, level: ActivityLevel, goal: Option<f64>) -> UserProfile {
        UserProfile::new(30, 180.0, 90.0, sex, level, goal).unwrap()
    }

    #[test]
    fn test_harris_benedict_male() {
        let bmr = calculate_harris_benedict(90.0, 180.0, 30, Sex::Male, &BmrConfig::default());
        assert!((bmr - 1987.602).abs() < 0.01);
    }

    #[test]
    fn test_harris_benedict_female() {
        let bmr = calculate_harris_benedict(60.0, 165.0, 25, Sex::Female, &BmrConfig::default());
        // 447.593 + 554.82 + 511.17 - 108.25
        assert!((bmr - 1405.333).abs() < 0.01);
    }

    #[test]
    fn test_adjustment_sign_follows_direction() {
        assert!((daily_calorie_adjustment(0.7, GoalDirection::Loss) + 770.0).abs() < 1e-9);
        assert!((daily_calorie_adjustment(0.35, GoalDirection::Gain) - 385.0).abs() < 1e-9);
        assert!(daily_calorie_adjustment(0.7, GoalDirection::Maintain).abs() < f64::EPSILON);
    }

    #[test]
    fn test_backup_calories_male_loss() {
        let config = NutritionConfig::default();
        let p = profile(Sex::Male, ActivityLevel::Moderate, Some(80.0));
        // 1987.602 * 1.55 - 770 = 2310.78
        assert_eq!(calculate_backup_calories(&p, 0.7, &config), 2311);
    }

    #[test]
    fn test_backup_calories_is_deterministic() {
        let config = NutritionConfig::default();
        let p = profile(Sex::Female, ActivityLevel::Light, Some(95.0));
        let first = calculate_backup_calories(&p, 0.25, &config);
        for _ in 0..10 {
            assert_eq!(calculate_backup_calories(&p, 0.25, &config), first);
        }
    }

    #[test]
    fn test_floor_uses_absolute_minimum_for_small_profiles() {
        let config = NutritionConfig::default();
        let small =
            UserProfile::new(70, 150.0, 45.0, Sex::Female, ActivityLevel::Sedentary, None).unwrap();
        // MSJ = 450 + 937.5 - 350 - 161 = 876.5, below the 1200 floor
        assert!((minimum_safe_calories(&small, &config) - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_scales_with_activity() {
        let config = NutritionConfig::default();
        let sedentary = minimum_safe_calories(&profile(Sex::Male, ActivityLevel::Sedentary, None), &config);
        let very_active =
            minimum_safe_calories(&profile(Sex::Male, ActivityLevel::VeryActive, None), &config);
        assert!((very_active / sedentary - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_respects_both_bounds() {
        assert_eq!(clamp_recommended_calories(900.0, 1500.0), 1500);
        assert_eq!(clamp_recommended_calories(4800.0, 1500.0), 4000);
        assert_eq!(clamp_recommended_calories(2210.4, 1500.0), 2210);
    }

    #[test]
    fn test_clamp_never_rounds_below_fractional_floor() {
        let config = NutritionConfig::default();
        let light =
            UserProfile::new(25, 165.0, 55.0, Sex::Female, ActivityLevel::Light, Some(59.0))
                .unwrap();
        let floor = minimum_safe_calories(&light, &config);
        assert!(floor.fract() > 0.0 && floor.fract() < 0.5);

        let clamped = clamp_recommended_calories(1000.0, floor);
        assert!(f64::from(clamped) >= floor);
        assert_eq!(clamped, 1361);
        assert_eq!(clamp_recommended_calories(1360.3, 1360.0125), 1361);
        assert_eq!(clamp_recommended_calories(5000.0, 4200.0), 4000);
    }
}
