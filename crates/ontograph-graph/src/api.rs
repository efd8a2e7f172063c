//! API client for the search endpoint

use ontograph_types::{SearchQuery, SearchResponse};
use thiserror::Error;

/// Environment variable with the server base URL
pub const API_URL_ENV: &str = "ONTOGRAPH_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Client for `ONTOGRAPH_API_URL`, or the local default
    pub fn from_env() -> Self {
        let url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the search endpoint for `query`
    pub fn search_url(&self, query: &SearchQuery) -> Result<reqwest::Url, ApiError> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&query.to_pairs())
            .build()?;
        Ok(request.url().clone())
    }

    /// `GET /search`
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ApiError> {
        let url = self.search_url(query)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}
