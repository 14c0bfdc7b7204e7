//! dev-proxy: development reverse proxy for ArtemiS3
//!
//! Stands in front of the UI dev server and forwards API traffic to the
//! backend unchanged, so the browser only ever talks to one origin.
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! listen_addr = "0.0.0.0:5173"
//!
//! [[routes]]
//! path_prefix = "/api"
//! backend = "http://backend:8000"
//! change_origin = true
//! ```

pub mod config;
pub mod error;
pub mod proxy;
pub mod router;

pub use config::ProxyConfig;
pub use error::{ProxyError, Result};
pub use proxy::ProxyServer;
