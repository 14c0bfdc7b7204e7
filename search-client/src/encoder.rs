//! Query-string encoding for search requests
//!
//! Every request field is first classified as absent, a single scalar, or a
//! repeated list, then written by the matching branch. The location is always
//! written first.

use chrono::{DateTime, SecondsFormat, Utc};
use url::form_urlencoded;

use crate::types::SearchRequest;

/// Wire parameter names
pub mod wire {
    pub const S3_URI: &str = "s3_uri";
    pub const CONTAINS: &str = "contains";
    pub const LIMIT: &str = "limit";
    pub const SUFFIXES: &str = "suffixes";
    pub const MIN_SIZE: &str = "min_size";
    pub const MAX_SIZE: &str = "max_size";
    pub const STORAGE_CLASSES: &str = "storage_classes";
    pub const MODIFIED_AFTER: &str = "modified_after";
    pub const MODIFIED_BEFORE: &str = "modified_before";
    pub const SORT_BY: &str = "sort_by";
    pub const SORT_DIRECTION: &str = "sort_direction";
}

/// Shape of one request field on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Absent,
    Scalar(String),
    Repeated(&'a [String]),
}

impl<'a> FieldValue<'a> {
    fn scalar<T: ToString>(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::Scalar(v.to_string()),
            None => FieldValue::Absent,
        }
    }

    fn repeated(values: &'a [String]) -> Self {
        if values.is_empty() {
            FieldValue::Absent
        } else {
            FieldValue::Repeated(values)
        }
    }

    fn timestamp(value: Option<&DateTime<Utc>>) -> Self {
        match value {
            Some(at) => FieldValue::Scalar(format_timestamp(at)),
            None => FieldValue::Absent,
        }
    }
}

/// RFC 3339 in UTC with a `Z` suffix; fractional seconds only when non-zero
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Optional fields in the order they are written after `s3_uri`
fn optional_fields(request: &SearchRequest) -> [(&'static str, FieldValue<'_>); 10] {
    [
        (wire::CONTAINS, FieldValue::scalar(request.contains.as_deref())),
        (wire::LIMIT, FieldValue::scalar(request.limit)),
        (wire::SUFFIXES, FieldValue::repeated(&request.suffixes)),
        (wire::MIN_SIZE, FieldValue::scalar(request.min_size)),
        (wire::MAX_SIZE, FieldValue::scalar(request.max_size)),
        (
            wire::STORAGE_CLASSES,
            FieldValue::repeated(&request.storage_classes),
        ),
        (
            wire::MODIFIED_AFTER,
            FieldValue::timestamp(request.modified_after.as_ref()),
        ),
        (
            wire::MODIFIED_BEFORE,
            FieldValue::timestamp(request.modified_before.as_ref()),
        ),
        (wire::SORT_BY, FieldValue::scalar(request.sort_by)),
        (wire::SORT_DIRECTION, FieldValue::scalar(request.sort_direction)),
    ]
}

/// Unescaped `(wire name, value)` pairs in encoding order
pub fn encode_pairs(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut pairs = vec![(wire::S3_URI, request.location_uri.clone())];

    for (name, value) in optional_fields(request) {
        match value {
            FieldValue::Absent => {}
            FieldValue::Scalar(v) => pairs.push((name, v)),
            FieldValue::Repeated(values) => {
                pairs.extend(values.iter().map(|v| (name, v.clone())));
            }
        }
    }

    pairs
}

/// Encode a request as an `application/x-www-form-urlencoded` query string
pub fn encode(request: &SearchRequest) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in encode_pairs(request) {
        serializer.append_pair(name, &value);
    }
    serializer.finish()
}
