//! Work sources.
//!
//! This module defines the [`WorkSource`] trait that resolves work identifiers
//! into [`Work`] records. [`OpenAlexSource`] talks to the OpenAlex REST API;
//! [`MockSource`] serves canned records for tests and offline use.
//!
//! A source only fetches. Walking from one work to its neighbours, and pacing
//! those requests, is done by [`crate::graph::WorkGraph`].

mod openalex;

pub mod mock;

pub use mock::MockSource;
pub use openalex::{OpenAlexSource, OPENALEX_API_BASE};

use crate::models::{Work, WorkId, WorkList};
use async_trait::async_trait;

/// The WorkSource trait is the seam between citation logic and the network.
#[async_trait]
pub trait WorkSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "openalex")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch a single work
    async fn get_work(&self, id: &WorkId) -> Result<Work, SourceError>;

    /// Fetch one page of a cited-by listing, given the URL a work advertises
    /// in `cited_by_api_url`
    async fn get_cited_by(&self, cited_by_url: &str) -> Result<WorkList, SourceError>;
}

/// Errors that can occur when fetching or formatting a work
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status returned by the API
    #[error("API error: {0}")]
    Api(String),

    /// Response body was not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Work not found (404)
    #[error("Work not found: {0}")]
    NotFound(String),

    /// A field the operation depends on is absent from the record
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The record's type cannot be expressed in the requested format
    #[error("Unsupported type {0}")]
    UnsupportedType(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SourceError {
    pub fn missing(field: impl Into<String>) -> Self {
        SourceError::MissingField(field.into())
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
