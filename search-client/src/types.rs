//! Search request and result types

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Sort key understood by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    Key,
    Size,
    LastModified,
}

impl SortBy {
    /// Wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Key => "Key",
            SortBy::Size => "Size",
            SortBy::LastModified => "LastModified",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Key" => Ok(SortBy::Key),
            "Size" => Ok(SortBy::Size),
            "LastModified" => Ok(SortBy::LastModified),
            other => Err(format!(
                "unknown sort key '{}' (expected Key, Size or LastModified)",
                other
            )),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{}' (expected asc or desc)", other)),
        }
    }
}

/// Search query against an object-storage location
///
/// Only `location_uri` is required. Every other field is left out of the
/// encoded query when unset; an empty list counts as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Storage location to search within (e.g. `s3://bucket/prefix`)
    pub location_uri: String,
    /// Case-sensitive substring the key must contain
    pub contains: Option<String>,
    /// Maximum number of results
    pub limit: Option<NonZeroU32>,
    /// Accepted key suffixes (any of)
    pub suffixes: Vec<String>,
    /// Minimum object size in bytes
    pub min_size: Option<u64>,
    /// Maximum object size in bytes
    pub max_size: Option<u64>,
    /// Accepted storage classes (any of)
    pub storage_classes: Vec<String>,
    /// Lower bound on last-modified time
    pub modified_after: Option<DateTime<Utc>>,
    /// Upper bound on last-modified time
    pub modified_before: Option<DateTime<Utc>>,
    /// Sort key
    pub sort_by: Option<SortBy>,
    /// Sort direction
    pub sort_direction: Option<SortDirection>,
}

impl SearchRequest {
    /// Create a request with only the location set
    pub fn new(location_uri: impl Into<String>) -> Self {
        Self {
            location_uri: location_uri.into(),
            contains: None,
            limit: None,
            suffixes: Vec::new(),
            min_size: None,
            max_size: None,
            storage_classes: Vec::new(),
            modified_after: None,
            modified_before: None,
            sort_by: None,
            sort_direction: None,
        }
    }

    pub fn contains(mut self, substring: impl Into<String>) -> Self {
        self.contains = Some(substring.into());
        self
    }

    pub fn limit(mut self, limit: NonZeroU32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Append one accepted suffix
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into());
        self
    }

    pub fn suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes.extend(suffixes.into_iter().map(Into::into));
        self
    }

    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = Some(bytes);
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Append one accepted storage class
    pub fn storage_class(mut self, class: impl Into<String>) -> Self {
        self.storage_classes.push(class.into());
        self
    }

    pub fn storage_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.storage_classes
            .extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn modified_after(mut self, at: DateTime<Utc>) -> Self {
        self.modified_after = Some(at);
        self
    }

    pub fn modified_before(mut self, at: DateTime<Utc>) -> Self {
        self.modified_before = Some(at);
        self
    }

    pub fn sort(mut self, by: SortBy, direction: SortDirection) -> Self {
        self.sort_by = Some(by);
        self.sort_direction = Some(direction);
        self
    }

    pub fn sort_by(mut self, by: SortBy) -> Self {
        self.sort_by = Some(by);
        self
    }

    pub fn sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = Some(direction);
        self
    }
}

/// One matched object returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    /// Object key
    pub key: String,
    /// Object size in bytes
    pub size: u64,
    /// Last-modified time as sent by the server (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Storage class label (e.g. STANDARD, GLACIER)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl SearchResultRecord {
    /// Parse `last_modified` as RFC 3339, if present and well-formed
    pub fn last_modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.last_modified
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }
}

/// Backend health response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
