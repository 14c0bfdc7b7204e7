//! Configuration for search-client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SearchError};

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "ARTEMIS_BASE_URL";

/// Client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Backend root (e.g., "http://127.0.0.1:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Search endpoint path
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Health endpoint path
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Index refresh endpoint path
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_search_path() -> String {
    "/api/s3/search".to_string()
}

fn default_health_path() -> String {
    "/api/health".to_string()
}

fn default_refresh_path() -> String {
    "/api/s3/refresh".to_string()
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SearchError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Defaults for a backend running locally
    pub fn development() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            health_path: default_health_path(),
            refresh_path: default_refresh_path(),
            timeout_seconds: None,
        }
    }

    /// Default configuration pointed at another backend
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::development()
        }
    }

    /// Apply `ARTEMIS_BASE_URL` if it is set
    pub fn apply_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            SearchError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        for (name, path) in [
            ("search_path", &self.search_path),
            ("health_path", &self.health_path),
            ("refresh_path", &self.refresh_path),
        ] {
            if !path.starts_with('/') {
                return Err(SearchError::Config(format!(
                    "{} must start with '/': {}",
                    name, path
                )));
            }
        }

        if self.timeout_seconds == Some(0) {
            return Err(SearchError::Config("timeout_seconds must be positive".to_string()));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}
