// ABOUTME: Nutrition configuration for calorie targets, weekly rates, and macro splits
// ABOUTME: Harris-Benedict and Mifflin-St Jeor coefficients, activity factors, safety floors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition Configuration
//!
//! # Scientific References
//!
//! - Harris, J.A., & Benedict, F.G. (1918), revised by Roza & Shizgal (1984).
//!   *American Journal of Clinical Nutrition*, 40(1), 168-182.
//! - Mifflin, M.D., et al. (1990) DOI: 10.1093/ajcn/51.2.241
//! - Activity factors: `McArdle` et al. (2010) - Exercise Physiology

use super::error::ConfigError;
use pierre_core::models::{ActivityLevel, GoalDirection};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable overriding the very-active weekly loss rate
pub const ENV_VERY_ACTIVE_LOSS_RATE: &str = "PIERRE_VERY_ACTIVE_LOSS_RATE";

/// Highest weekly rate accepted in any table (kg/week)
const MAX_WEEKLY_RATE_KG: f64 = 1.5;

/// Nutrition configuration for the calorie engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionConfig {
    /// BMR equation coefficients
    pub bmr: BmrConfig,
    /// Activity factor multipliers for TDEE
    pub activity_factors: ActivityFactorsConfig,
    /// Weekly weight change rates
    pub rates: RateTablesConfig,
    /// Minimum safe calorie floors
    pub safety_floor: SafetyFloorConfig,
}

impl NutritionConfig {
    /// Defaults with environment overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed or fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = env::var(ENV_VERY_ACTIVE_LOSS_RATE) {
            config.rates.loss.very_active = raw.trim().parse().map_err(|_| {
                ConfigError::Parse(format!("{ENV_VERY_ACTIVE_LOSS_RATE}='{raw}' is not a number"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate every table
    ///
    /// # Errors
    ///
    /// Returns an error if any factor or rate is out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.activity_factors.validate()?;
        self.rates.validate()?;
        self.safety_floor.validate()
    }
}

/// BMR equation coefficients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BmrConfig {
    /// Harris-Benedict male constant (88.362)
    pub hb_male_constant: f64,
    /// Harris-Benedict male weight coefficient (13.397)
    pub hb_male_weight_coef: f64,
    /// Harris-Benedict male height coefficient (4.799)
    pub hb_male_height_coef: f64,
    /// Harris-Benedict male age coefficient (5.677, subtracted)
    pub hb_male_age_coef: f64,
    /// Harris-Benedict female constant (447.593)
    pub hb_female_constant: f64,
    /// Harris-Benedict female weight coefficient (9.247)
    pub hb_female_weight_coef: f64,
    /// Harris-Benedict female height coefficient (3.098)
    pub hb_female_height_coef: f64,
    /// Harris-Benedict female age coefficient (4.330, subtracted)
    pub hb_female_age_coef: f64,
    /// Mifflin-St Jeor weight coefficient (10.0)
    pub msj_weight_coef: f64,
    /// Mifflin-St Jeor height coefficient (6.25)
    pub msj_height_coef: f64,
    /// Mifflin-St Jeor age coefficient (5.0, subtracted)
    pub msj_age_coef: f64,
    /// Mifflin-St Jeor male constant (+5)
    pub msj_male_constant: f64,
    /// Mifflin-St Jeor female constant (-161)
    pub msj_female_constant: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            hb_male_constant: 88.362,
            hb_male_weight_coef: 13.397,
            hb_male_height_coef: 4.799,
            hb_male_age_coef: 5.677,
            hb_female_constant: 447.593,
            hb_female_weight_coef: 9.247,
            hb_female_height_coef: 3.098,
            hb_female_age_coef: 4.330,
            msj_weight_coef: 10.0,
            msj_height_coef: 6.25,
            msj_age_coef: 5.0,
            msj_male_constant: 5.0,
            msj_female_constant: -161.0,
        }
    }
}

/// Activity factor multipliers for TDEE calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityFactorsConfig {
    /// Sedentary: 1.2
    pub sedentary: f64,
    /// Light: 1.375
    pub light: f64,
    /// Moderate: 1.55
    pub moderate: f64,
    /// Active: 1.725
    pub active: f64,
    /// Very active: 1.9
    pub very_active: f64,
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            light: 1.375,
            moderate: 1.55,
            active: 1.725,
            very_active: 1.9,
        }
    }
}

impl ActivityFactorsConfig {
    /// Factor for an activity level
    #[must_use]
    pub const fn factor(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if ActivityLevel::ALL
            .iter()
            .any(|level| !(1.0..=2.5).contains(&self.factor(*level)))
        {
            return Err(ConfigError::InvalidRange(
                "activity factors must be between 1.0 and 2.5",
            ));
        }
        Ok(())
    }
}

/// Weekly rate (kg/week) for each activity level
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyRateTable {
    /// Sedentary rate
    pub sedentary: f64,
    /// Light rate
    pub light: f64,
    /// Moderate rate
    pub moderate: f64,
    /// Active rate
    pub active: f64,
    /// Very active rate
    pub very_active: f64,
}

impl WeeklyRateTable {
    /// Rate for an activity level
    #[must_use]
    pub const fn rate(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }

    fn validate(&self, message: &'static str) -> Result<(), ConfigError> {
        if ActivityLevel::ALL.iter().any(|level| {
            let rate = self.rate(*level);
            !(rate > 0.0 && rate <= MAX_WEEKLY_RATE_KG)
        }) {
            return Err(ConfigError::InvalidRange(message));
        }
        Ok(())
    }
}

/// Loss and gain weekly rate tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateTablesConfig {
    /// Rates used when the goal is below current weight
    pub loss: WeeklyRateTable,
    /// Rates used when the goal is above current weight
    pub gain: WeeklyRateTable,
}

impl Default for RateTablesConfig {
    fn default() -> Self {
        Self {
            // Very active loss is 0.9 here; the profile screens once used 1.0.
            loss: WeeklyRateTable {
                sedentary: 0.5,
                light: 0.6,
                moderate: 0.7,
                active: 0.8,
                very_active: 0.9,
            },
            gain: WeeklyRateTable {
                sedentary: 0.2,
                light: 0.25,
                moderate: 0.3,
                active: 0.35,
                very_active: 0.4,
            },
        }
    }
}

impl RateTablesConfig {
    /// Weekly rate for a level and goal direction; maintenance is always 0
    #[must_use]
    pub const fn weekly_rate(&self, level: ActivityLevel, direction: GoalDirection) -> f64 {
        match direction {
            GoalDirection::Loss => self.loss.rate(level),
            GoalDirection::Gain => self.gain.rate(level),
            GoalDirection::Maintain => 0.0,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.loss
            .validate("loss rates must be in (0, 1.5] kg/week")?;
        self.gain
            .validate("gain rates must be in (0, 1.5] kg/week")
    }
}

/// Per-activity multipliers applied to the minimum safe floor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyFloorConfig {
    /// Sedentary multiplier
    pub sedentary: f64,
    /// Light multiplier
    pub light: f64,
    /// Moderate multiplier
    pub moderate: f64,
    /// Active multiplier
    pub active: f64,
    /// Very active multiplier
    pub very_active: f64,
}

impl Default for SafetyFloorConfig {
    fn default() -> Self {
        Self {
            sedentary: 1.0,
            light: 1.05,
            moderate: 1.1,
            active: 1.15,
            very_active: 1.2,
        }
    }
}

impl SafetyFloorConfig {
    /// Multiplier for an activity level
    #[must_use]
    pub const fn multiplier(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if ActivityLevel::ALL
            .iter()
            .any(|level| !(1.0..=1.2).contains(&self.multiplier(*level)))
        {
            return Err(ConfigError::InvalidRange(
                "safety floor multipliers must be between 1.0 and 1.2",
            ));
        }
        Ok(())
    }
}
