//! Configuration for dev-proxy

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ProxyError, Result};

/// Main proxy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Forwarding rules
    pub routes: Vec<RouteConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:5173")
    pub listen_addr: String,
    /// Request timeout in seconds; unset means wait for the backend
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Forwarding rule
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path prefix to match (e.g., "/api")
    pub path_prefix: String,
    /// Backend URL (e.g., "http://backend:8000")
    pub backend: String,
    /// Strip path prefix before forwarding
    #[serde(default)]
    pub strip_prefix: bool,
    /// Send the backend's authority as the Host header
    #[serde(default = "default_change_origin")]
    pub change_origin: bool,
    /// Request timeout override
    pub timeout_seconds: Option<u64>,
}

fn default_change_origin() -> bool {
    true
}

impl ProxyConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProxyError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ProxyError::Config(format!("Failed to parse config: {}", e)))
    }

    /// `/api` forwarded, path preserved, to the backend container
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:5173".to_string(),
                timeout_seconds: None,
            },
            routes: vec![RouteConfig {
                path_prefix: "/api".to_string(),
                backend: "http://backend:8000".to_string(),
                strip_prefix: false,
                change_origin: true,
                timeout_seconds: None,
            }],
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.routes.is_empty() {
            return Err(ProxyError::Config("No routes configured".to_string()));
        }

        if self.server.timeout_seconds == Some(0) {
            return Err(ProxyError::Config("timeout_seconds must be positive".to_string()));
        }

        for route in &self.routes {
            if route.timeout_seconds == Some(0) {
                return Err(ProxyError::Config(format!(
                    "timeout_seconds must be positive for route {}",
                    route.path_prefix
                )));
            }

            if !route.path_prefix.starts_with('/') {
                return Err(ProxyError::Config(format!(
                    "Path prefix must start with '/': {}",
                    route.path_prefix
                )));
            }

            let backend = url::Url::parse(&route.backend).map_err(|e| {
                ProxyError::Config(format!("Invalid backend URL '{}': {}", route.backend, e))
            })?;
            if backend.scheme() != "http" {
                return Err(ProxyError::Config(format!(
                    "Only http backends are supported: {}",
                    route.backend
                )));
            }
        }

        Ok(())
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::development()
    }
}
