// ABOUTME: Profile data sources feeding the recommendation engine
// ABOUTME: ProfileDataSource trait with HTTP and static in-memory implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Profile data sources.
//!
//! The engine reads two things from the outside world: bulk historical
//! records used as training data, and the current profile of one user.
//! Records are decoded one at a time so a single malformed entry is dropped
//! with a warning instead of failing the whole batch.

use crate::errors::{ProviderError, ProviderResult};
use crate::http_client::shared_client;
use async_trait::async_trait;
use pierre_core::models::{ProfileRecord, TrainingRecord};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Name used in logs and errors for the HTTP profile service
pub const PROFILE_API_NAME: &str = "profile-api";

/// Source of profile data for training and prediction
#[async_trait]
pub trait ProfileDataSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Historical records with observed intake, used as real training data
    async fn fetch_training_records(&self) -> ProviderResult<Vec<TrainingRecord>>;

    /// Current profile of one user; `None` when the user is unknown
    async fn fetch_current_profile(&self, user_id: &str) -> ProviderResult<Option<ProfileRecord>>;
}

/// Training endpoint payload: a bare array or an object wrapping one
#[derive(Deserialize)]
#[serde(untagged)]
enum TrainingPayload {
    Bare(Vec<Value>),
    Wrapped { profiles: Vec<Value> },
}

impl TrainingPayload {
    fn into_values(self) -> Vec<Value> {
        match self {
            Self::Bare(values) | Self::Wrapped { profiles: values } => values,
        }
    }
}

/// Decode records one by one, dropping those that do not deserialize
#[must_use]
pub fn decode_training_records(values: Vec<Value>) -> Vec<TrainingRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "dropping malformed training record");
                None
            }
        })
        .collect()
}

/// Profile service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpProfileSource {
    base_url: Url,
    client: Client,
}

impl HttpProfileSource {
    /// Source rooted at `base_url`, using the shared pooled client
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the URL cannot be parsed or cannot carry a path
    pub fn new(base_url: &str) -> ProviderResult<Self> {
        Self::with_client(base_url, shared_client().clone())
    }

    /// Source rooted at `base_url` with an explicit client
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the URL cannot be parsed or cannot carry a path
    pub fn with_client(base_url: &str, client: Client) -> ProviderResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| config_error(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(config_error(format!("{base_url} cannot be a base URL")));
        }
        Ok(Self { base_url, client })
    }

    /// Base URL of the service
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| config_error(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> ProviderResult<Response> {
        debug!(%url, "profile api request");
        Ok(self.client.get(url).send().await?)
    }
}

#[async_trait]
impl ProfileDataSource for HttpProfileSource {
    fn name(&self) -> &'static str {
        PROFILE_API_NAME
    }

    async fn fetch_training_records(&self) -> ProviderResult<Vec<TrainingRecord>> {
        let response = self.get(self.endpoint(&["profiles", "training"])?).await?;
        let response = ensure_success(response).await?;
        let payload: TrainingPayload = response.json().await.map_err(parse_error)?;
        Ok(decode_training_records(payload.into_values()))
    }

    async fn fetch_current_profile(&self, user_id: &str) -> ProviderResult<Option<ProfileRecord>> {
        if user_id.trim().is_empty() {
            return Err(config_error("user id must not be empty".to_owned()));
        }
        let response = self.get(self.endpoint(&["profiles", user_id])?).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        response.json().await.map(Some).map_err(parse_error)
    }
}

async fn ensure_success(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(
        status = status.as_u16(),
        body_length = body.len(),
        "profile api request failed"
    );
    Err(ProviderError::ApiError {
        provider: PROFILE_API_NAME.to_owned(),
        status_code: status.as_u16(),
        message: format!("request failed with status {status}"),
        retryable: status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS,
    })
}

fn parse_error(error: reqwest::Error) -> ProviderError {
    ProviderError::ParseError {
        provider: PROFILE_API_NAME.to_owned(),
        reason: error.to_string(),
    }
}

fn config_error(details: String) -> ProviderError {
    ProviderError::ConfigurationError {
        provider: PROFILE_API_NAME.to_owned(),
        details,
    }
}

/// Fixed in-memory records, for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct StaticProfileSource {
    training: Vec<TrainingRecord>,
    profiles: Vec<(String, ProfileRecord)>,
}

impl StaticProfileSource {
    /// Source serving the given training records and no user profiles
    #[must_use]
    pub const fn new(training: Vec<TrainingRecord>) -> Self {
        Self {
            training,
            profiles: Vec::new(),
        }
    }

    /// Source with no data at all
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Add a user profile served by `fetch_current_profile`
    #[must_use]
    pub fn with_profile(mut self, user_id: impl Into<String>, profile: ProfileRecord) -> Self {
        self.profiles.push((user_id.into(), profile));
        self
    }
}

#[async_trait]
impl ProfileDataSource for StaticProfileSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_training_records(&self) -> ProviderResult<Vec<TrainingRecord>> {
        Ok(self.training.clone())
    }

    async fn fetch_current_profile(&self, user_id: &str) -> ProviderResult<Option<ProfileRecord>> {
        Ok(self
            .profiles
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, profile)| profile.clone()))
    }
}
