// ABOUTME: Converts raw training records from the profile service into a TrainingSet
// ABOUTME: Invalid records are skipped with a warning instead of failing the whole batch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::RateTablesConfig;
use pierre_core::errors::RecommendationError;
use pierre_core::models::{
    FeatureVector, GoalDirection, TrainingExample, TrainingRecord, TrainingSet,
};
use tracing::warn;

/// Build one labeled example; the target rate comes from the rate tables
///
/// # Errors
///
/// Returns the validation error of the first bad field
pub fn example_from_record(
    record: &TrainingRecord,
    rates: &RateTablesConfig,
) -> Result<TrainingExample, RecommendationError> {
    let (profile, goal, calories) = record.validated()?;
    let direction = GoalDirection::between(profile.weight_kg, goal);
    let target_rate = rates.weekly_rate(profile.activity_level, direction);
    Ok(TrainingExample {
        features: FeatureVector::from_profile(&profile, goal, target_rate),
        calories,
    })
}

/// Convert every usable record, logging and dropping the rest
#[must_use]
pub fn training_set_from_records(records: &[TrainingRecord], rates: &RateTablesConfig) -> TrainingSet {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match example_from_record(record, rates) {
            Ok(example) => Some(example),
            Err(error) => {
                warn!(index, %error, "skipping unusable training record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pierre_core::models::ProfileRecord;

    fn record(weight_goal: Option<f64>, calorie_intake: Option<f64>) -> TrainingRecord {
        TrainingRecord {
            profile: ProfileRecord {
                age: Some(28.0),
                height: Some(165.0),
                weight: Some(60.0),
                sex: Some("female".to_owned()),
                activity_level: Some("light".to_owned()),
                weight_goal,
            },
            calorie_intake,
        }
    }

    #[test]
    fn test_gain_record_uses_gain_rate() {
        let example = example_from_record(&record(Some(65.0), Some(2100.0)), &RateTablesConfig::default())
            .unwrap();
        assert!((example.features.0[FeatureVector::TARGET_RATE] - 0.25).abs() < f64::EPSILON);
        assert!((example.calories - 2100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unusable_records_are_skipped() {
        let records = vec![
            record(Some(55.0), Some(1700.0)),
            record(None, Some(1800.0)),
            record(Some(55.0), None),
            record(Some(55.0), Some(-5.0)),
            TrainingRecord::default(),
        ];
        let set = training_set_from_records(&records, &RateTablesConfig::default());
        assert_eq!(set.len(), 1);
        assert!((set.inputs[0].0[FeatureVector::TARGET_RATE] - 0.6).abs() < f64::EPSILON);
    }
}
