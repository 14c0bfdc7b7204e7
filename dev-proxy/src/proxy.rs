//! HTTP reverse proxy server

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{CONNECTION, HOST},
        HeaderMap, HeaderName, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::ProxyConfig;
use crate::error::Result;
use crate::router::Router as ProxyRouter;

/// HTTP client type for forwarding requests
type HttpClient = Client<hyper_util::client::legacy::connect::HttpConnector, Body>;

/// Headers that apply to a single connection and are never forwarded
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Shared proxy state
pub struct ProxyState {
    /// Request router
    pub router: ProxyRouter,
    /// HTTP client for forwarding
    pub client: HttpClient,
    /// Default timeout, if any
    pub default_timeout: Option<u64>,
}

/// Proxy server
pub struct ProxyServer {
    config: ProxyConfig,
    state: Arc<ProxyState>,
}

impl ProxyServer {
    /// Create a new proxy server
    pub fn new(config: ProxyConfig) -> Result<Self> {
        config.validate()?;

        let router = ProxyRouter::new(config.routes.clone());

        let client: HttpClient = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(30))
            .build_http();

        let state = Arc::new(ProxyState {
            router,
            client,
            default_timeout: config.server.timeout_seconds,
        });

        Ok(Self { config, state })
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_endpoint))
            .route("/*path", any(proxy_handler))
            .route("/", any(proxy_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until the process exits
    pub async fn run(&self) -> Result<()> {
        let addr = &self.config.server.listen_addr;
        info!("Starting dev proxy on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("Configured routes:");
        for route in self.state.router.routes() {
            info!("  {} -> {}", route.path_prefix, route.backend);
        }

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Liveness of the proxy itself
async fn health_endpoint() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Forward a request to the backend owning its path prefix
async fn proxy_handler(
    State(state): State<Arc<ProxyState>>,
    req: Request<Body>,
) -> Response {
    let path = req.uri().path().to_string();
    let query = req
        .uri()
        .query()
        .map(|q| format!("?{}", q))
        .unwrap_or_default();

    debug!("Proxying request: {} {}{}", req.method(), path, query);

    let matched = match state.router.match_route(&path, state.default_timeout) {
        Ok(m) => m,
        Err(e) => {
            warn!("{}", e);
            return (StatusCode::NOT_FOUND, "Not Found").into_response();
        }
    };

    let forward_uri = format!("{}{}{}", matched.backend, matched.forward_path, query);
    debug!("Forwarding to: {}", forward_uri);

    let uri: Uri = match forward_uri.parse() {
        Ok(u) => u,
        Err(e) => {
            error!("Invalid forward URI {}: {}", forward_uri, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error").into_response();
        }
    };

    let (mut parts, body) = req.into_parts();
    parts.uri = uri;

    strip_hop_by_hop(&mut parts.headers);

    // Without a Host header the client derives it from the backend URI
    if matched.change_origin {
        if let Some(original_host) = parts.headers.remove(HOST) {
            parts.headers.insert("x-forwarded-host", original_host);
        }
    }

    let forward_req = Request::from_parts(parts, body);
    let pending = state.client.request(forward_req);

    let result = match matched.timeout_seconds {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), pending).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Backend timed out after {}s: {}", secs, forward_uri);
                return (StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout").into_response();
            }
        },
        None => pending.await,
    };

    match result {
        Ok(response) => {
            let (mut parts, body) = response.into_parts();
            strip_hop_by_hop(&mut parts.headers);
            axum::http::Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            error!("Backend error for {}: {}", forward_uri, e);
            (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
        }
    }
}

/// Remove connection-scoped headers, including any the `Connection` header names
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for header in HOP_BY_HOP_HEADERS {
        headers.remove(header);
    }
}
