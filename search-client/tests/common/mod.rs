//! Reference server-side decoding of search query strings

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use search_client::SearchRequest;

pub fn pairs(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

pub fn values(query: &str, name: &str) -> Vec<String> {
    pairs(query)
        .into_iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v)
        .collect()
}

pub fn single<T: std::str::FromStr>(query: &str, name: &str) -> Option<T>
where
    T::Err: std::fmt::Debug,
{
    let mut found = values(query, name);
    assert!(found.len() <= 1, "{} appears more than once", name);
    found.pop().map(|v| v.parse().unwrap())
}

/// Reference server-side decoding of a search query
pub fn decode_request(query: &str) -> SearchRequest {
    let location: Vec<String> = values(query, "s3_uri");
    assert_eq!(location.len(), 1, "s3_uri must appear exactly once");

    SearchRequest {
        location_uri: location[0].clone(),
        contains: single(query, "contains"),
        limit: single(query, "limit"),
        suffixes: values(query, "suffixes"),
        min_size: single(query, "min_size"),
        max_size: single(query, "max_size"),
        storage_classes: values(query, "storage_classes"),
        modified_after: single::<DateTime<Utc>>(query, "modified_after"),
        modified_before: single::<DateTime<Utc>>(query, "modified_before"),
        sort_by: single(query, "sort_by"),
        sort_direction: single(query, "sort_direction"),
    }
}
