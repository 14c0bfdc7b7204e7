//! Client tests against an in-process stub backend

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{TimeZone, Utc};
use search_client::{
    ClientConfig, SearchClient, SearchError, SearchRequest, SearchResultRecord, SortBy,
    SortDirection,
};
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

mod common;

use common::{decode_request, pairs, values};

/// Canned response plus every query string the stub received
#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: &'static str,
    delay: Option<Duration>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            delay: None,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

async fn canned(State(stub): State<Stub>, RawQuery(query): RawQuery) -> (StatusCode, &'static str) {
    stub.queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }
    (stub.status, stub.body)
}

/// Serve the stub on an ephemeral port and return its base URL
async fn spawn_backend(stub: Stub) -> String {
    let app = Router::new()
        .route("/api/s3/search", get(canned))
        .route("/api/s3/refresh", get(canned))
        .route("/api/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_search_success_decodes_records() {
    let stub = Stub::new(StatusCode::OK, r#"[{"key":"a","size":1}]"#);
    let base_url = spawn_backend(stub.clone()).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let records = client.search(&SearchRequest::new("s3://b")).await.unwrap();

    assert_eq!(
        records,
        vec![SearchResultRecord {
            key: "a".to_string(),
            size: 1,
            last_modified: None,
            storage_class: None,
        }]
    );
    assert_eq!(stub.queries(), vec!["s3_uri=s3%3A%2F%2Fb".to_string()]);
}

#[tokio::test]
async fn test_search_preserves_server_order() {
    let stub = Stub::new(
        StatusCode::OK,
        r#"[
            {"key":"z.log","size":30,"last_modified":"2024-05-01T00:00:00+00:00","storage_class":"STANDARD"},
            {"key":"a.log","size":20,"last_modified":null,"storage_class":"GLACIER"},
            {"key":"m.log","size":10}
        ]"#,
    );
    let base_url = spawn_backend(stub).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let request = SearchRequest::new("s3://b").sort(SortBy::Size, SortDirection::Descending);
    let records = client.search(&request).await.unwrap();

    let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["z.log", "a.log", "m.log"]);
    assert_eq!(records[0].storage_class.as_deref(), Some("STANDARD"));
    assert!(records[0].last_modified_at().is_some());
    assert_eq!(records[1].last_modified, None);
}

#[tokio::test]
async fn test_search_empty_result() {
    let base_url = spawn_backend(Stub::new(StatusCode::OK, "[]")).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let records = client.search(&SearchRequest::new("s3://b")).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_search_failure_carries_status_and_body() {
    let base_url = spawn_backend(Stub::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let err = client.search(&SearchRequest::new("s3://b")).await.unwrap_err();

    match err {
        SearchError::RequestFailed { status, ref body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_search_bad_request_body_is_verbatim() {
    let body = r#"{"detail":"Invalid S3 URI: bucket"}"#;
    let base_url = spawn_backend(Stub::new(StatusCode::BAD_REQUEST, body)).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let err = client.search(&SearchRequest::new("bucket")).await.unwrap_err();
    assert!(matches!(err, SearchError::RequestFailed { status: 400, body: ref b } if b == body));
}

#[tokio::test]
async fn test_search_transport_error() {
    // Reserve a port, then close it so nothing is listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SearchClient::with_base_url(format!("http://{}", addr)).unwrap();
    let err = client.search(&SearchRequest::new("s3://b")).await.unwrap_err();

    match err {
        SearchError::Transport(cause) => assert!(cause.is_connect() || cause.is_request()),
        other => panic!("expected Transport, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_success_with_invalid_body() {
    let base_url = spawn_backend(Stub::new(StatusCode::OK, r#"{"not":"an array"}"#)).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let err = client.search(&SearchRequest::new("s3://b")).await.unwrap_err();
    assert!(matches!(err, SearchError::Decode(_)));
}

#[tokio::test]
async fn test_round_trip_every_field() {
    let stub = Stub::new(StatusCode::OK, "[]");
    let base_url = spawn_backend(stub.clone()).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let request = SearchRequest::new("s3://nasa pds/Mars/Geology & Maps/")
        .contains("year-2019")
        .limit(NonZeroU32::new(250).unwrap())
        .suffixes([".pdf", ".tar.gz", ".pdf"])
        .min_size(0)
        .max_size(u64::MAX)
        .storage_classes(["STANDARD", "DEEP_ARCHIVE"])
        .modified_after(Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap())
        .modified_before(Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap())
        .sort(SortBy::LastModified, SortDirection::Ascending);

    client.search(&request).await.unwrap();

    let queries = stub.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(decode_request(&queries[0]), request);
}

#[tokio::test]
async fn test_absent_and_empty_fields_are_not_sent() {
    let stub = Stub::new(StatusCode::OK, "[]");
    let base_url = spawn_backend(stub.clone()).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let request = SearchRequest::new("s3://b").suffixes(Vec::<String>::new());
    client.search(&request).await.unwrap();

    let query = &stub.queries()[0];
    let names: Vec<String> = pairs(query).into_iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["s3_uri".to_string()]);
    assert!(!query.contains("null"));
    assert!(!query.contains("undefined"));
}

#[tokio::test]
async fn test_concurrent_searches_are_independent() {
    let stub = Stub::new(StatusCode::OK, "[]");
    let base_url = spawn_backend(stub.clone()).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..8 {
        let client = client.clone();
        tasks.spawn(async move {
            let request = SearchRequest::new("s3://b").contains(format!("part-{}", i));
            client.search(&request).await
        });
    }
    while let Some(result) = tasks.join_next().await {
        assert!(result.unwrap().unwrap().is_empty());
    }

    // Identical or not, every call reaches the server exactly once
    let mut contains: Vec<String> = stub
        .queries()
        .iter()
        .flat_map(|q| values(q, "contains"))
        .collect();
    contains.sort();
    let expected: Vec<String> = (0..8).map(|i| format!("part-{}", i)).collect();
    assert_eq!(contains, expected);
}

#[tokio::test]
async fn test_dropped_call_is_cancelled() {
    let stub = Stub::new(StatusCode::OK, "[]").delayed(Duration::from_secs(30));
    let base_url = spawn_backend(stub).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let request = SearchRequest::new("s3://b");
    let outcome = tokio::time::timeout(Duration::from_millis(200), client.search(&request)).await;
    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_configured_timeout_surfaces_as_transport_error() {
    let stub = Stub::new(StatusCode::OK, "[]").delayed(Duration::from_secs(5));
    let base_url = spawn_backend(stub).await;

    let mut config = ClientConfig::with_base_url(base_url);
    config.timeout_seconds = Some(1);
    let client = SearchClient::new(config).unwrap();

    let err = client.search(&SearchRequest::new("s3://b")).await.unwrap_err();
    match err {
        SearchError::Transport(cause) => assert!(cause.is_timeout()),
        other => panic!("expected Transport, got {:?}", other),
    }
}

#[tokio::test]
async fn test_health() {
    let base_url = spawn_backend(Stub::new(StatusCode::OK, "[]")).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let health = client.health().await.unwrap();
    assert!(health.is_ok());
}

#[tokio::test]
async fn test_refresh_index_sends_location() {
    let stub = Stub::new(StatusCode::OK, "null");
    let base_url = spawn_backend(stub.clone()).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    client.refresh_index("s3://bucket/prefix").await.unwrap();
    assert_eq!(
        stub.queries(),
        vec!["s3_uri=s3%3A%2F%2Fbucket%2Fprefix".to_string()]
    );
}

#[tokio::test]
async fn test_refresh_index_failure() {
    let base_url = spawn_backend(Stub::new(StatusCode::BAD_REQUEST, "Invalid S3 URI: x")).await;
    let client = SearchClient::with_base_url(base_url).unwrap();

    let err = client.refresh_index("x").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}
