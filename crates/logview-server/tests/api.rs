//! End-to-end tests driving the query API through the router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use logview_core::{LogRecord, LogRetriever};
use logview_server::{LogviewConfig, LogviewServer};
use logview_store::{KeyLayout, LogStoreAdapter, MemoryStore, load_reader};
use serde_json::Value;
use tower::ServiceExt;

const SEED: &str = r#"{"timestamp":1000,"level":"info","service":"monarch","message":"boot"}
{"timestamp":2000,"level":"ERROR","service":"monarch","message":"upstream timed out"}
{"timestamp":3000,"level":"info","service":"worker","message":"job done","job_id":7}
not json at all
"#;

fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    let report = load_reader(&store, &KeyLayout::default(), SEED.as_bytes()).unwrap();
    assert_eq!(report.indexed, 3);
    assert_eq!(report.skipped, 1);
    Arc::new(store)
}

fn app_for(store: Arc<MemoryStore>) -> Router {
    let adapter: Arc<dyn LogStoreAdapter> = store;
    LogviewServer::new(LogviewConfig::default(), LogRetriever::new(adapter)).router()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn timestamps(json: &Value) -> Vec<i64> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|r| r["timestamp"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn time_range_is_newest_first_and_bounded() {
    let app = app_for(seeded_store());

    let (status, json) = get(app.clone(), "/api/logs?start_time=0&end_time=5000&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timestamps(&json), vec![3000, 2000, 1000]);

    let (_, json) = get(app.clone(), "/api/logs?start_time=0&end_time=5000&limit=2").await;
    assert_eq!(timestamps(&json), vec![3000, 2000]);

    let (_, json) = get(app, "/api/logs?start_time=1500&end_time=2500").await;
    assert_eq!(timestamps(&json), vec![2000]);
}

#[tokio::test]
async fn iso_times_are_accepted() {
    let app = app_for(seeded_store());
    let (status, json) = get(
        app,
        "/api/logs?start_time=1970-01-01T00:00:00Z&end_time=1970-01-01T00:00:02",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timestamps(&json), vec![2000, 1000]);
}

#[tokio::test]
async fn level_query_normalizes_and_returns_records() {
    let app = app_for(seeded_store());

    let (status, json) = get(app.clone(), "/api/logs?level=Error").await;
    assert_eq!(status, StatusCode::OK);
    let records: Vec<LogRecord> = serde_json::from_value(json).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, "error");
    assert_eq!(records[0].message, "upstream timed out");

    let (status, json) = get(app, "/api/logs?level=critical").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn service_query_keeps_extra_fields() {
    let app = app_for(seeded_store());
    let (status, json) = get(app, "/api/logs?service=worker").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(timestamps(&json), vec![3000]);
    assert_eq!(json[0]["fields"]["job_id"], 7);
}

#[tokio::test]
async fn numeric_service_is_queryable_and_discoverable() {
    let store = MemoryStore::new();
    let seed = r#"{"timestamp":1000,"level":"info","service":42,"message":"numeric"}"#;
    load_reader(&store, &KeyLayout::default(), seed.as_bytes()).unwrap();
    let app = app_for(Arc::new(store));

    let (_, json) = get(app.clone(), "/api/logs?service=42").await;
    assert_eq!(timestamps(&json), vec![1000]);
    assert_eq!(json[0]["service"], "42");

    let (_, json) = get(app, "/api/services").await;
    assert_eq!(json, serde_json::json!(["42"]));
}

#[tokio::test]
async fn zero_limit_is_empty() {
    let app = app_for(seeded_store());
    let (status, json) = get(app, "/api/logs?level=info&limit=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn bad_parameters_are_rejected() {
    let app = app_for(seeded_store());

    let (status, json) = get(app.clone(), "/api/logs?limit=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_request");

    let (status, _) = get(app, "/api/logs?start_time=last-tuesday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn discovery_reports_indexed_values() {
    let app = app_for(seeded_store());

    let (status, json) = get(app.clone(), "/api/log-levels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!(["error", "info"]));

    let (_, json) = get(app, "/api/services").await;
    assert_eq!(json, serde_json::json!(["monarch", "worker"]));
}

#[tokio::test]
async fn discovery_on_empty_store_reports_defaults() {
    let app = app_for(Arc::new(MemoryStore::new()));

    let (_, json) = get(app.clone(), "/api/log-levels").await;
    assert_eq!(json, serde_json::json!(["debug", "error", "info", "warning"]));

    let (_, json) = get(app, "/api/services").await;
    assert_eq!(json, serde_json::json!(["monarch"]));
}

#[tokio::test]
async fn unavailable_store() {
    let store = seeded_store();
    store.set_available(false);
    let app = app_for(store);

    let (status, json) = get(app.clone(), "/api/logs?level=info").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "store_unavailable");

    let (status, json) = get(app.clone(), "/api/services").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!(["monarch"]));

    let (status, json) = get(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["store"], false);
}

#[tokio::test]
async fn server_without_retriever() {
    let app = LogviewServer::without_retriever(LogviewConfig::default()).router();

    let (status, json) = get(app.clone(), "/api/logs").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "unavailable");

    let (status, json) = get(app.clone(), "/api/logs?level=info&limit=5").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "unavailable");

    let (status, _) = get(app.clone(), "/api/logs?limit=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = get(app.clone(), "/api/log-levels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 4);

    let (_, json) = get(app, "/api/health").await;
    assert_eq!(json["status"], "degraded");
}

#[tokio::test]
async fn healthy_store() {
    let app = app_for(seeded_store());
    let (status, json) = get(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store"], true);
    assert!(json["uptime_secs"].is_u64());
}
