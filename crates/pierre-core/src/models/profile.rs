// ABOUTME: User profile models for calorie recommendation inputs
// ABOUTME: Raw ProfileRecord boundary type and validated UserProfile with enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::profile_limits::{
    MAX_AGE_YEARS, MAX_HEIGHT_CM, MAX_WEIGHT_KG, MIN_AGE_YEARS,
};
use crate::errors::RecommendationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Biological sex used by the BMR equations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl Sex {
    /// Numeric code used in the model feature vector (female 0, male 1)
    #[must_use]
    pub const fn code(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }

    /// Parse from a profile string, accepting the localized labels the
    /// profile service emits alongside the canonical ones
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" | "man" | "masculino" | "hombre" => Some(Self::Male),
            "female" | "f" | "woman" | "femenino" | "mujer" => Some(Self::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise or a physical job
    VeryActive,
}

impl ActivityLevel {
    /// All levels in ascending order of activity
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::Active,
        Self::VeryActive,
    ];

    /// Numeric code used in the model feature vector (1-5)
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Sedentary => 1,
            Self::Light => 2,
            Self::Moderate => 3,
            Self::Active => 4,
            Self::VeryActive => 5,
        }
    }

    /// Inverse of [`ActivityLevel::code`]
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Sedentary),
            2 => Some(Self::Light),
            3 => Some(Self::Moderate),
            4 => Some(Self::Active),
            5 => Some(Self::VeryActive),
            _ => None,
        }
    }

    /// Parse from a profile string
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => Some(Self::Sedentary),
            "light" | "lightly_active" => Some(Self::Light),
            "moderate" | "moderately_active" => Some(Self::Moderate),
            "active" => Some(Self::Active),
            "very_active" | "veryactive" | "extra_active" => Some(Self::VeryActive),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        };
        f.write_str(label)
    }
}

/// Direction of the active weight goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalDirection {
    /// Goal weight below current weight
    Loss,
    /// Goal weight equal to current weight
    Maintain,
    /// Goal weight above current weight
    Gain,
}

impl GoalDirection {
    /// Classify a goal relative to the current weight
    #[must_use]
    pub fn between(current_kg: f64, goal_kg: f64) -> Self {
        if goal_kg < current_kg {
            Self::Loss
        } else if goal_kg > current_kg {
            Self::Gain
        } else {
            Self::Maintain
        }
    }

    /// Whether this direction implies a calorie deficit
    #[must_use]
    pub const fn is_loss(self) -> bool {
        matches!(self, Self::Loss)
    }
}

/// Profile exactly as it arrives from the profile service or the UI.
///
/// Every field is optional here; [`UserProfile::try_from`] decides what is
/// acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Height in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Sex label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    /// Activity level label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    /// Goal weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_goal: Option<f64>,
}

/// Validated user profile; every numeric field is finite and in range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: u32,
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Biological sex
    pub sex: Sex,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Goal weight in kilograms; `None` means no active goal
    pub weight_goal_kg: Option<f64>,
}

impl UserProfile {
    /// Build a profile from already-typed values
    ///
    /// # Errors
    ///
    /// Returns `IncompleteProfile` for zero values and `InvalidProfile` for
    /// values outside the accepted ranges
    pub fn new(
        age: u32,
        height_cm: f64,
        weight_kg: f64,
        sex: Sex,
        activity_level: ActivityLevel,
        weight_goal_kg: Option<f64>,
    ) -> Result<Self, RecommendationError> {
        if age == 0 {
            return Err(RecommendationError::IncompleteProfile { field: "age" });
        }
        if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age) {
            return Err(RecommendationError::InvalidProfile {
                field: "age",
                reason: format!("must be between {MIN_AGE_YEARS} and {MAX_AGE_YEARS} years"),
            });
        }
        let height_cm = positive_measure("height", height_cm, MAX_HEIGHT_CM)?;
        let weight_kg = positive_measure("weight", weight_kg, MAX_WEIGHT_KG)?;
        let weight_goal_kg = match weight_goal_kg {
            None => None,
            Some(goal) if goal == 0.0 => None,
            Some(goal) => Some(positive_measure("weightGoal", goal, MAX_WEIGHT_KG)?),
        };

        Ok(Self {
            age,
            height_cm,
            weight_kg,
            sex,
            activity_level,
            weight_goal_kg,
        })
    }

    /// Direction of the weight goal, `None` when no goal is set
    #[must_use]
    pub fn goal_direction(&self) -> Option<GoalDirection> {
        self.weight_goal_kg
            .map(|goal| GoalDirection::between(self.weight_kg, goal))
    }
}

impl TryFrom<&ProfileRecord> for UserProfile {
    type Error = RecommendationError;

    fn try_from(record: &ProfileRecord) -> Result<Self, Self::Error> {
        let age = required_number("age", record.age)?;
        if age.fract() != 0.0 {
            return Err(RecommendationError::InvalidProfile {
                field: "age",
                reason: "must be a whole number of years".to_owned(),
            });
        }
        let height = required_number("height", record.height)?;
        let weight = required_number("weight", record.weight)?;

        let sex_label = required_text("sex", record.sex.as_deref())?;
        let sex = Sex::parse(sex_label).ok_or_else(|| RecommendationError::InvalidProfile {
            field: "sex",
            reason: format!("unrecognized value '{sex_label}'"),
        })?;

        let activity_label = required_text("activityLevel", record.activity_level.as_deref())?;
        let activity_level = ActivityLevel::parse(activity_label).ok_or_else(|| {
            RecommendationError::InvalidProfile {
                field: "activityLevel",
                reason: format!("unrecognized value '{activity_label}'"),
            }
        })?;

        if !(f64::from(MIN_AGE_YEARS)..=f64::from(MAX_AGE_YEARS)).contains(&age) {
            return Err(RecommendationError::InvalidProfile {
                field: "age",
                reason: format!("must be between {MIN_AGE_YEARS} and {MAX_AGE_YEARS} years"),
            });
        }

        Self::new(
            age as u32,
            height,
            weight,
            sex,
            activity_level,
            record.weight_goal,
        )
    }
}

impl From<&UserProfile> for ProfileRecord {
    fn from(profile: &UserProfile) -> Self {
        Self {
            age: Some(f64::from(profile.age)),
            height: Some(profile.height_cm),
            weight: Some(profile.weight_kg),
            sex: Some(profile.sex.to_string()),
            activity_level: Some(profile.activity_level.to_string()),
            weight_goal: profile.weight_goal_kg,
        }
    }
}

fn required_number(field: &'static str, value: Option<f64>) -> Result<f64, RecommendationError> {
    match value {
        None => Err(RecommendationError::IncompleteProfile { field }),
        Some(v) if v == 0.0 => Err(RecommendationError::IncompleteProfile { field }),
        Some(v) if !v.is_finite() => Err(RecommendationError::InvalidProfile {
            field,
            reason: "must be a finite number".to_owned(),
        }),
        Some(v) => Ok(v),
    }
}

fn required_text<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, RecommendationError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(RecommendationError::IncompleteProfile { field }),
    }
}

fn positive_measure(field: &'static str, value: f64, max: f64) -> Result<f64, RecommendationError> {
    if value == 0.0 {
        return Err(RecommendationError::IncompleteProfile { field });
    }
    if !value.is_finite() || value < 0.0 || value > max {
        return Err(RecommendationError::InvalidProfile {
            field,
            reason: format!("must be greater than 0 and at most {max}"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> ProfileRecord {
        ProfileRecord {
            age: Some(30.0),
            height: Some(180.0),
            weight: Some(90.0),
            sex: Some("male".to_owned()),
            activity_level: Some("moderate".to_owned()),
            weight_goal: Some(80.0),
        }
    }

    #[test]
    fn test_complete_record_parses() {
        let profile = UserProfile::try_from(&complete_record()).unwrap();
        assert_eq!(profile.age, 30);
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
        assert_eq!(profile.goal_direction(), Some(GoalDirection::Loss));
    }

    #[test]
    fn test_missing_activity_level_is_incomplete() {
        let record = ProfileRecord {
            activity_level: None,
            ..complete_record()
        };
        assert_eq!(
            UserProfile::try_from(&record),
            Err(RecommendationError::IncompleteProfile {
                field: "activityLevel"
            })
        );
    }

    #[test]
    fn test_zero_weight_is_incomplete() {
        let record = ProfileRecord {
            weight: Some(0.0),
            ..complete_record()
        };
        assert_eq!(
            UserProfile::try_from(&record),
            Err(RecommendationError::IncompleteProfile { field: "weight" })
        );
    }

    #[test]
    fn test_negative_height_is_invalid() {
        let record = ProfileRecord {
            height: Some(-170.0),
            ..complete_record()
        };
        assert!(matches!(
            UserProfile::try_from(&record),
            Err(RecommendationError::InvalidProfile {
                field: "height",
                ..
            })
        ));
    }

    #[test]
    fn test_localized_sex_labels() {
        assert_eq!(Sex::parse("Masculino"), Some(Sex::Male));
        assert_eq!(Sex::parse(" mujer "), Some(Sex::Female));
        assert_eq!(Sex::parse("other"), None);
    }

    #[test]
    fn test_missing_goal_is_not_an_error() {
        let record = ProfileRecord {
            weight_goal: None,
            ..complete_record()
        };
        let profile = UserProfile::try_from(&record).unwrap();
        assert_eq!(profile.goal_direction(), None);
    }

    #[test]
    fn test_camel_case_json_boundary() {
        let record: ProfileRecord = serde_json::from_str(
            r#"{"age":25,"height":165,"weight":60,"sex":"female","activityLevel":"very_active","weightGoal":62}"#,
        )
        .unwrap();
        let profile = UserProfile::try_from(&record).unwrap();
        assert_eq!(profile.activity_level, ActivityLevel::VeryActive);
        assert_eq!(profile.goal_direction(), Some(GoalDirection::Gain));
    }

    #[test]
    fn test_activity_codes_round_trip() {
        for level in ActivityLevel::ALL {
            assert_eq!(ActivityLevel::from_code(level.code()), Some(level));
        }
    }
}
