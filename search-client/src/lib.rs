//! search-client: typed client for the ArtemiS3 search API
//!
//! Turns a [`SearchRequest`] into the query string the backend expects,
//! issues a single GET against `/api/s3/search` and decodes the JSON array
//! of matched objects.
//!
//! # Example
//!
//! ```no_run
//! use search_client::{SearchClient, SearchRequest, SortBy, SortDirection};
//! use std::num::NonZeroU32;
//!
//! # async fn run() -> search_client::Result<()> {
//! let client = SearchClient::with_base_url("http://localhost:8000")?;
//! let request = SearchRequest::new("s3://bucket/Mars")
//!     .suffixes([".pdf", ".txt"])
//!     .limit(NonZeroU32::new(25).unwrap())
//!     .sort(SortBy::Size, SortDirection::Descending);
//!
//! for record in client.search(&request).await? {
//!     println!("{}: {} bytes", record.key, record.size);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod location;
pub mod types;

pub use client::SearchClient;
pub use config::ClientConfig;
pub use encoder::encode;
pub use error::{Result, SearchError};
pub use location::S3Location;
pub use types::{HealthStatus, SearchRequest, SearchResultRecord, SortBy, SortDirection};
