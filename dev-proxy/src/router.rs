//! Path-prefix routing for dev-proxy

use crate::config::RouteConfig;
use crate::error::{ProxyError, Result};

/// Router for matching request paths to backends
pub struct Router {
    routes: Vec<RouteConfig>,
}

/// Matched route with resolved backend
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    /// Backend URL
    pub backend: String,
    /// Path to forward (after stripping prefix if configured)
    pub forward_path: String,
    /// Rewrite Host to the backend authority
    pub change_origin: bool,
    /// Request timeout, if any
    pub timeout_seconds: Option<u64>,
}

impl Router {
    /// Create a new router with the given routes
    pub fn new(routes: Vec<RouteConfig>) -> Self {
        // Longest prefix first
        let mut routes = routes;
        routes.sort_by(|a, b| b.path_prefix.len().cmp(&a.path_prefix.len()));
        Self { routes }
    }

    /// Find the forwarding rule for a request path
    pub fn match_route(&self, path: &str, default_timeout: Option<u64>) -> Result<MatchedRoute> {
        let route = self
            .routes
            .iter()
            .find(|route| path.starts_with(&route.path_prefix))
            .ok_or_else(|| ProxyError::RouteNotFound {
                path: path.to_string(),
            })?;

        let forward_path = if route.strip_prefix {
            let stripped = path.strip_prefix(&route.path_prefix).unwrap_or(path);
            format!("/{}", stripped.trim_start_matches('/'))
        } else {
            path.to_string()
        };

        Ok(MatchedRoute {
            backend: route.backend.trim_end_matches('/').to_string(),
            forward_path,
            change_origin: route.change_origin,
            timeout_seconds: route.timeout_seconds.or(default_timeout),
        })
    }

    /// Get all configured routes
    pub fn routes(&self) -> &[RouteConfig] {
        &self.routes
    }
}
