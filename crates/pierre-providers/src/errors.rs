// ABOUTME: Error type for profile data source failures
// ABOUTME: Distinguishes API status errors, transport failures, and unparseable payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Failure talking to a profile data source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The service answered with a non-success status
    #[error("{provider} API error ({status_code}): {message}")]
    ApiError {
        /// Source name
        provider: String,
        /// HTTP status returned
        status_code: u16,
        /// Response summary
        message: String,
        /// Whether the same request may succeed later
        retryable: bool,
    },

    /// The request never produced a response
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The response body was not the expected JSON
    #[error("Failed to parse {provider} response: {reason}")]
    ParseError {
        /// Source name
        provider: String,
        /// Parser message
        reason: String,
    },

    /// The source is misconfigured (bad base URL, unusable identifier)
    #[error("{provider} configuration error: {details}")]
    ConfigurationError {
        /// Source name
        provider: String,
        /// What is wrong
        details: String,
    },
}

impl ProviderError {
    /// Whether retrying the same call might succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { retryable, .. } => *retryable,
            Self::NetworkError(_) => true,
            Self::ParseError { .. } | Self::ConfigurationError { .. } => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        Self::NetworkError(error.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        let code = match &error {
            ProviderError::ApiError { .. } | ProviderError::ParseError { .. } => {
                ErrorCode::ExternalServiceError
            }
            ProviderError::NetworkError(_) => ErrorCode::ExternalServiceUnavailable,
            ProviderError::ConfigurationError { .. } => ErrorCode::ConfigInvalid,
        };
        Self::new(code, error.to_string())
    }
}

/// Result alias for profile source calls
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let server_error = ProviderError::ApiError {
            provider: "profile-api".to_owned(),
            status_code: 503,
            message: "unavailable".to_owned(),
            retryable: true,
        };
        assert!(server_error.is_retryable());
        assert!(ProviderError::NetworkError("reset".to_owned()).is_retryable());
        assert!(!ProviderError::ParseError {
            provider: "profile-api".to_owned(),
            reason: "expected array".to_owned(),
        }
        .is_retryable());
    }

    #[test]
    fn test_app_error_codes() {
        let app: AppError = ProviderError::NetworkError("timeout".to_owned()).into();
        assert_eq!(app.code, ErrorCode::ExternalServiceUnavailable);
        let app: AppError = ProviderError::ConfigurationError {
            provider: "profile-api".to_owned(),
            details: "bad url".to_owned(),
        }
        .into();
        assert_eq!(app.code, ErrorCode::ConfigInvalid);
    }
}
