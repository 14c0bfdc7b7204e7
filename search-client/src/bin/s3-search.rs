//! Command-line search against the ArtemiS3 backend
//!
//! # Usage
//!
//! ```bash
//! # first 5 objects under a prefix
//! s3-search s3://bucket/Mars --limit 5
//!
//! # PDFs and text files, largest first
//! s3-search s3://bucket/Mars --suffix .pdf --suffix .txt --sort-by Size --sort-direction desc
//!
//! # objects modified during 2024, printed as JSON
//! s3-search s3://bucket --modified-after 2024-01-01T00:00:00Z \
//!     --modified-before 2025-01-01T00:00:00Z --json
//! ```

use chrono::{DateTime, Utc};
use clap::Parser;
use search_client::{
    ClientConfig, S3Location, SearchClient, SearchRequest, SortBy, SortDirection,
};
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset: library warnings plus this binary's progress
const DEFAULT_LOG_FILTER: &str = "search_client=warn,s3_search=info";

#[derive(Parser)]
#[command(name = "s3-search")]
#[command(about = "Search objects in an S3 location through the ArtemiS3 API", long_about = None)]
struct Cli {
    /// Location to search (s3://bucket/prefix)
    s3_uri: String,

    /// Case-sensitive substring the key must contain
    #[arg(long)]
    contains: Option<String>,

    /// Maximum number of results
    #[arg(long, default_value = "10")]
    limit: NonZeroU32,

    /// Accepted key suffix (repeatable)
    #[arg(long = "suffix")]
    suffixes: Vec<String>,

    /// Minimum size in bytes
    #[arg(long)]
    min_size: Option<u64>,

    /// Maximum size in bytes
    #[arg(long)]
    max_size: Option<u64>,

    /// Accepted storage class (repeatable)
    #[arg(long = "storage-class")]
    storage_classes: Vec<String>,

    /// Only objects modified after this RFC 3339 time
    #[arg(long)]
    modified_after: Option<DateTime<Utc>>,

    /// Only objects modified before this RFC 3339 time
    #[arg(long)]
    modified_before: Option<DateTime<Utc>>,

    /// Sort key: Key, Size or LastModified
    #[arg(long)]
    sort_by: Option<SortBy>,

    /// Sort direction: asc or desc
    #[arg(long)]
    sort_direction: Option<SortDirection>,

    /// Backend URL (overrides config and ARTEMIS_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Client configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn request(&self) -> SearchRequest {
        let mut request = SearchRequest::new(self.s3_uri.clone())
            .limit(self.limit)
            .suffixes(self.suffixes.iter().cloned())
            .storage_classes(self.storage_classes.iter().cloned());

        request.contains = self.contains.clone();
        request.min_size = self.min_size;
        request.max_size = self.max_size;
        request.modified_after = self.modified_after;
        request.modified_before = self.modified_before;
        request.sort_by = self.sort_by;
        request.sort_direction = self.sort_direction;
        request
    }

    fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::development(),
        };
        let mut config = config.apply_env();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let location = S3Location::parse(&cli.s3_uri)?;
    info!("Searching bucket '{}' under prefix '{}'", location.bucket, location.prefix);

    let client = SearchClient::new(cli.client_config()?)?;
    let records = client.search(&cli.request()).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}: {} bytes", record.key, record.size);
        }
    }

    Ok(())
}
