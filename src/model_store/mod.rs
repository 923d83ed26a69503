// ABOUTME: Persistent key/value storage for trained model state
// ABOUTME: Pluggable backends (in-memory, filesystem) behind the async ModelStore trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Filesystem store, one file per key
pub mod file;
/// In-memory store for tests and ephemeral sessions
pub mod memory;

pub use file::FileModelStore;
pub use memory::InMemoryModelStore;

use pierre_core::errors::AppError;
use std::io;
use thiserror::Error;

/// Storage backend failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key contains characters that are not allowed
    #[error("Invalid store key '{0}'")]
    InvalidKey(String),

    /// Filesystem operation failed
    #[error("I/O error on key '{key}': {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Any other backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        Self::storage(error.to_string())
    }
}

/// Byte-oriented storage for persisted model halves
#[async_trait::async_trait]
pub trait ModelStore: Send + Sync {
    /// Read a value; `None` when the key is absent
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove a value; removing an absent key succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Keys are restricted to `[A-Za-z0-9._-]` so they map safely to file names
///
/// # Errors
///
/// Returns `InvalidKey` for empty keys, dot-only keys, or disallowed characters
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let allowed = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if key.is_empty() || !allowed || key.chars().all(|c| c == '.') {
        return Err(StoreError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(validate_key("calorie-model.weights").is_ok());
        assert!(validate_key("model_v2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("..").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }
}
