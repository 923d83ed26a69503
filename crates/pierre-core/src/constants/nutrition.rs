// ABOUTME: Nutrition and energy-balance constants shared by the calorie engine
// ABOUTME: Energy density, macro energy values, sanity ranges, and dataset thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Energy balance constants
pub mod energy {
    /// Energy stored in one kilogram of body mass (kcal/kg)
    pub const KCAL_PER_KG_BODY_MASS: f64 = 7700.0;
    /// Days in a week, used to turn weekly rates into daily adjustments
    pub const DAYS_PER_WEEK: f64 = 7.0;
}

/// Energy content of each macronutrient (kcal per gram)
pub mod macros {
    /// Protein: 4 kcal/g
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// Carbohydrates: 4 kcal/g
    pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
    /// Fat: 9 kcal/g
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
}

/// Business-rule bounds applied to calorie targets
pub mod calorie_limits {
    /// Lowest raw model prediction accepted before falling back to the formula
    pub const SANE_PREDICTION_MIN_KCAL: f64 = 800.0;
    /// Highest raw model prediction accepted before falling back to the formula
    pub const SANE_PREDICTION_MAX_KCAL: f64 = 5000.0;
    /// Ceiling for any final recommendation
    pub const MAX_RECOMMENDED_KCAL: f64 = 4000.0;
    /// Absolute floor for male recommendations
    pub const MALE_FLOOR_KCAL: f64 = 1500.0;
    /// Absolute floor for female recommendations
    pub const FEMALE_FLOOR_KCAL: f64 = 1200.0;
}

/// Accepted ranges for profile fields at the parse boundary
pub mod profile_limits {
    /// Minimum age in years
    pub const MIN_AGE_YEARS: u32 = 1;
    /// Maximum age in years
    pub const MAX_AGE_YEARS: u32 = 120;
    /// Maximum height in centimeters
    pub const MAX_HEIGHT_CM: f64 = 300.0;
    /// Maximum weight in kilograms
    pub const MAX_WEIGHT_KG: f64 = 500.0;
}

/// Training dataset thresholds
pub mod dataset {
    /// Width of the model feature vector
    pub const FEATURE_COUNT: usize = 7;
    /// Real examples required before real-data training is attempted.
    /// Kept low so small deployments and tests exercise the real-data path.
    pub const MIN_REAL_TRAINING_EXAMPLES: usize = 5;
    /// Lower bound on generated synthetic examples
    pub const SYNTHETIC_SAMPLES_MIN: usize = 100;
    /// Upper bound on generated synthetic examples
    pub const SYNTHETIC_SAMPLES_MAX: usize = 200;
}
