// ABOUTME: Error taxonomy for calorie recommendation, training, and model persistence
// ABOUTME: Maps each failure to an ErrorCode so it can cross into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use serde_json::json;
use thiserror::Error;

/// Failures raised by the recommendation pipeline.
///
/// Only [`RecommendationError::IncompleteProfile`] and
/// [`RecommendationError::InvalidProfile`] are meant to reach end users; the
/// engine absorbs every other variant and falls back to the backup formula.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecommendationError {
    /// A required profile field is missing or zero
    #[error("Profile is incomplete: missing {field}")]
    IncompleteProfile {
        /// Name of the missing field
        field: &'static str,
    },

    /// A profile field is present but unusable
    #[error("Profile field {field} is invalid: {reason}")]
    InvalidProfile {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Not enough training examples to fit the model
    #[error("Insufficient training data: {available} examples available, {required} required")]
    InsufficientData {
        /// Number of usable examples
        available: usize,
        /// Number of examples required
        required: usize,
    },

    /// Persisted model state is missing, partial, or corrupt
    #[error("Failed to load persisted model: {reason}")]
    ModelLoad {
        /// Description of the failure
        reason: String,
    },

    /// The model or its normalization bounds have not been initialized
    #[error("Model is not ready for prediction")]
    ModelNotReady,

    /// Raw prediction fell outside the sane calorie range
    #[error("Prediction of {value:.0} kcal is outside the accepted range")]
    PredictionOutOfRange {
        /// Raw predicted value
        value: f64,
    },

    /// Another training run is already in flight
    #[error("A training run is already in progress")]
    TrainingBusy,

    /// Training failed for a reason other than data volume
    #[error("Training failed: {reason}")]
    Training {
        /// Description of the failure
        reason: String,
    },
}

impl RecommendationError {
    /// Whether the error should be shown to the person whose profile was used
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::IncompleteProfile { .. } | Self::InvalidProfile { .. }
        )
    }

    /// Standard error code for this failure
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::IncompleteProfile { .. } => ErrorCode::MissingRequiredField,
            Self::InvalidProfile { .. } => ErrorCode::InvalidInput,
            Self::InsufficientData { .. } | Self::ModelNotReady => ErrorCode::ResourceUnavailable,
            Self::ModelLoad { .. } => ErrorCode::StorageError,
            Self::PredictionOutOfRange { .. } => ErrorCode::ValueOutOfRange,
            Self::TrainingBusy => ErrorCode::ResourceLocked,
            Self::Training { .. } => ErrorCode::InternalError,
        }
    }
}

impl From<RecommendationError> for AppError {
    fn from(error: RecommendationError) -> Self {
        let details = match &error {
            RecommendationError::IncompleteProfile { field }
            | RecommendationError::InvalidProfile { field, .. } => json!({ "field": field }),
            RecommendationError::InsufficientData {
                available,
                required,
            } => json!({ "available": available, "required": required }),
            _ => serde_json::Value::Null,
        };
        Self::new(error.code(), error.to_string()).with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_profile_errors_are_user_facing() {
        assert!(RecommendationError::IncompleteProfile { field: "age" }.is_user_facing());
        assert!(!RecommendationError::TrainingBusy.is_user_facing());
        assert!(!RecommendationError::PredictionOutOfRange { value: 9000.0 }.is_user_facing());
    }

    #[test]
    fn test_conversion_keeps_field_details() {
        let app: AppError = RecommendationError::IncompleteProfile {
            field: "activityLevel",
        }
        .into();
        assert_eq!(app.code, ErrorCode::MissingRequiredField);
        assert_eq!(app.details["field"], "activityLevel");
    }
}
