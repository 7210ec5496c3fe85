//! HTTP search backend
//!
//! Covers only the three chat endpoints the search orchestrator consumes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use super::traits::{ApiError, ApiResult, SearchApi};
use crate::config::SearchConfig;
use crate::domain::models::{AdvancedSearchResponse, SearchRequest, Transcription};
use crate::shared::errors::{AppError, Result};

/// Resolved endpoint URLs
#[derive(Debug, Clone)]
struct Endpoints {
    base: Url,
    list: Url,
    search: Url,
    advanced: Url,
}

impl Endpoints {
    fn resolve(base_url: &str) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let base = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base = Url::parse(&base)
            .map_err(|e| AppError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;

        let join = |path: &str| {
            base.join(path)
                .map_err(|e| AppError::Config(format!("invalid endpoint '{}': {}", path, e)))
        };

        Ok(Self {
            list: join("chats/")?,
            search: join("chats/search/")?,
            advanced: join("chats/search/advanced")?,
            base,
        })
    }
}

/// reqwest-backed [`SearchApi`]
#[derive(Debug, Clone)]
pub struct HttpSearchApi {
    client: Client,
    endpoints: Endpoints,
}

impl HttpSearchApi {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let endpoints = Endpoints::resolve(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            list = %endpoints.list,
            advanced = %endpoints.advanced,
            "HTTP search backend configured"
        );

        Ok(Self { client, endpoints })
    }

    pub fn base_url(&self) -> &str {
        self.endpoints.base.as_str()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url, params: &[(&str, String)]) -> ApiResult<T> {
        let response = self.client.get(url.clone()).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn list_all(&self) -> ApiResult<Vec<Transcription>> {
        self.get_json(&self.endpoints.list, &[]).await
    }

    async fn basic_search(&self, query: &str) -> ApiResult<Vec<Transcription>> {
        self.get_json(&self.endpoints.search, &[("query", query.to_string())])
            .await
    }

    async fn advanced_search(&self, request: &SearchRequest) -> ApiResult<AdvancedSearchResponse> {
        self.get_json(&self.endpoints.advanced, &request.advanced_query_params())
            .await
    }
}
