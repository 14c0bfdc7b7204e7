//! HTTP client for the search API

use reqwest::Url;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::encoder::{self, wire};
use crate::error::{Result, SearchError};
use crate::types::{HealthStatus, SearchRequest, SearchResultRecord};

/// Search API client
///
/// Cloning is cheap and clones share one connection pool. Calls are
/// independent of each other: no caching, no retries, no deduplication.
#[derive(Debug, Clone)]
pub struct SearchClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl SearchClient {
    /// Create a client from a validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SearchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create a client with default paths against `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::with_base_url(base_url))
    }

    /// Full URL of the search endpoint for `request`
    pub fn search_url(&self, request: &SearchRequest) -> Result<Url> {
        self.endpoint(&self.config.search_path, Some(&encoder::encode(request)))
    }

    /// Run a search and return the matched objects in server order
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResultRecord>> {
        let url = self.search_url(request)?;
        debug!("Searching {}", url);

        let body = self.get_success_body(url).await?;
        let records: Vec<SearchResultRecord> =
            serde_json::from_str(&body).map_err(SearchError::Decode)?;

        debug!("Search returned {} records", records.len());
        Ok(records)
    }

    /// Check backend health
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&self.config.health_path, None)?;
        debug!("Health check: {}", url);

        let body = self.get_success_body(url).await?;
        serde_json::from_str(&body).map_err(SearchError::Decode)
    }

    /// Ask the backend to rebuild its index for a location
    pub async fn refresh_index(&self, location_uri: &str) -> Result<()> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(wire::S3_URI, location_uri)
            .finish();
        let url = self.endpoint(&self.config.refresh_path, Some(&query))?;
        debug!("Refreshing index: {}", url);

        self.get_success_body(url).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str, query: Option<&str>) -> Result<Url> {
        let raw = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw)
            .map_err(|e| SearchError::Config(format!("Invalid endpoint URL '{}': {}", raw, e)))?;
        url.set_query(query);
        Ok(url)
    }

    /// Issue one GET; non-success statuses become `RequestFailed`
    async fn get_success_body(&self, url: Url) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Request failed with status {}: {}", status, body);
            return Err(SearchError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
