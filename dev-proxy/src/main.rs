//! dev-proxy: development reverse proxy server

use dev_proxy::{ProxyConfig, ProxyServer};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dev_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dev-proxy v{}", env!("CARGO_PKG_VERSION"));

    let config = if let Some(config_path) = std::env::args().nth(1) {
        info!("Loading configuration from {}", config_path);
        ProxyConfig::from_file(Path::new(&config_path))?
    } else {
        info!("No config file specified, using development defaults");
        ProxyConfig::development()
    };

    let server = ProxyServer::new(config)?;
    server.run().await?;

    Ok(())
}
