//! Search API traits and common types
//!
//! The orchestrator only needs three backend operations; anything that can
//! list, search and advanced-search chats can drive it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{AdvancedSearchResponse, SearchRequest, Transcription};

/// Errors returned by a search backend.
///
/// Dispatch logic treats every variant the same way; the variants only
/// shape the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Backend operations consumed by the search orchestrator
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Unfiltered chat list
    async fn list_all(&self) -> ApiResult<Vec<Transcription>>;

    /// Plain keyword search; filters are not supported
    async fn basic_search(&self, query: &str) -> ApiResult<Vec<Transcription>>;

    /// Filtered search returning items plus tag facets
    async fn advanced_search(&self, request: &SearchRequest) -> ApiResult<AdvancedSearchResponse>;
}
