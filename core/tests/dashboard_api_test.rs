//! Dashboard API Tests
//!
//! Drives the axum router in-process:
//! - report index, snapshot and metrics endpoints
//! - report replacement and its validation errors
//! - checklist and insight trackers
//! - DashboardConfig defaults

use axum::body::Body;
use axum::http::{Request, StatusCode as HttpStatus};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use statusdeck_core::dashboard::{router, DashboardConfig, DashboardState, EventBroadcaster};
use statusdeck_core::snapshots;
use statusdeck_core::{InMemoryKeyValueStore, InMemoryReportStore, KeyValueStore, ReportService};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> (Router, EventBroadcaster) {
    let broadcaster = EventBroadcaster::new(16);
    let service = ReportService::new(InMemoryReportStore::with_fixed_snapshots())
        .with_broadcaster(broadcaster.clone());
    let kv: Arc<dyn KeyValueStore> = InMemoryKeyValueStore::new();
    let state = DashboardState::new(Arc::new(service), kv, broadcaster.clone());
    (router(state), broadcaster)
}

async fn send(app: &Router, request: Request<Body>) -> (HttpStatus, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, HttpStatus::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn index_lists_every_kind() {
    let (app, _) = app();
    let (status, body) = send(&app, get("/api/reports")).await;
    assert_eq!(status, HttpStatus::OK);

    let kinds: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["chat-flow", "tab-audit", "enhancement", "diagnostic"]);
}

#[tokio::test]
async fn report_snapshot_uses_wire_contract() {
    let (app, _) = app();
    let (status, body) = send(&app, get("/api/reports/chat-flow")).await;
    assert_eq!(status, HttpStatus::OK);
    assert_eq!(body["stale"], false);
    assert_eq!(body["report"]["kind"], "chat-flow");

    let report = &body["report"]["report"];
    assert!(report["timestamp"].is_string());
    assert_eq!(report["version"], "1.0.0");
    assert_eq!(report["entries"][0]["tabName"], "Market Overview");
    assert_eq!(report["entries"][0]["contextStatus"], "✅");
}

#[tokio::test]
async fn metrics_endpoint_returns_counts_and_percent() {
    let (app, _) = app();
    let (status, body) = send(&app, get("/api/reports/enhancement/metrics")).await;
    assert_eq!(status, HttpStatus::OK);

    let metrics = &body["metrics"]["metrics"];
    assert_eq!(body["metrics"]["kind"], "enhancement");
    assert_eq!(metrics["totalTabs"], 7);
    assert_eq!(metrics["fullyEnhanced"], 2);
    assert_eq!(metrics["percentComplete"], 29);
    assert_eq!(body["stale"], false);
}

#[tokio::test]
async fn unknown_kind_is_404() {
    let (app, _) = app();
    let (status, body) = send(&app, get("/api/reports/payments")).await;
    assert_eq!(status, HttpStatus::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("payments"));
}

#[tokio::test]
async fn put_replaces_report_and_notifies() {
    let (app, broadcaster) = app();
    let mut rx = broadcaster.subscribe();

    let mut report = snapshots::enhancement_report();
    report.entries.truncate(1);
    let body = serde_json::to_string(&report).unwrap();

    let (status, _) = send(&app, with_json("PUT", "/api/reports/enhancement", body)).await;
    assert_eq!(status, HttpStatus::NO_CONTENT);

    let (_, body) = send(&app, get("/api/reports/enhancement/metrics")).await;
    assert_eq!(body["metrics"]["metrics"]["totalTabs"], 1);
    assert_eq!(body["metrics"]["metrics"]["percentComplete"], 100);

    let event = rx.try_recv().expect("update event");
    assert_eq!(event.percent_complete, 100);
}

#[tokio::test]
async fn put_with_bad_status_literal_is_422() {
    let (app, _) = app();
    let mut value = serde_json::to_value(snapshots::tab_audit_report()).unwrap();
    value["entries"][0]["apiConnectionStatus"] = Value::from("ok");

    let (status, body) = send(
        &app,
        with_json("PUT", "/api/reports/tab-audit", value.to_string()),
    )
    .await;
    assert_eq!(status, HttpStatus::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    // Original snapshot untouched
    let (_, body) = send(&app, get("/api/reports/tab-audit")).await;
    assert_eq!(body["report"]["report"]["entries"][0]["apiConnectionStatus"], "✅");
}

#[tokio::test]
async fn put_with_kind_mismatch_is_422() {
    let (app, _) = app();
    let body = serde_json::to_string(&snapshots::diagnostic_report()).unwrap();
    let (status, _) = send(&app, with_json("PUT", "/api/reports/chat-flow", body)).await;
    assert_eq!(status, HttpStatus::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Trackers
// =============================================================================

#[tokio::test]
async fn checklist_item_update_round_trips() {
    let (app, _) = app();

    let (status, body) = send(&app, get("/api/checklist")).await;
    assert_eq!(status, HttpStatus::OK);
    assert_eq!(body["metrics"]["fullyCompletePhases"], 1);

    for item in ["news_feed", "rate_limit_handling"] {
        let uri = format!("/api/checklist/phase-2/{}", item);
        let (status, _) = send(&app, with_json("POST", &uri, r#"{"status":"✅"}"#.to_string())).await;
        assert_eq!(status, HttpStatus::OK);
    }

    let (_, body) = send(&app, get("/api/checklist")).await;
    assert_eq!(body["metrics"]["fullyCompletePhases"], 2);
    assert_eq!(body["metrics"]["nextPhase"], "phase-3");
}

#[tokio::test]
async fn checklist_rejects_unknown_item_and_bad_status() {
    let (app, _) = app();

    let (status, _) = send(
        &app,
        with_json("POST", "/api/checklist/phase-2/unknown", r#"{"status":"✅"}"#.to_string()),
    )
    .await;
    assert_eq!(status, HttpStatus::NOT_FOUND);

    let (status, body) = send(
        &app,
        with_json("POST", "/api/checklist/phase-2/news_feed", r#"{"status":"yes"}"#.to_string()),
    )
    .await;
    assert_eq!(status, HttpStatus::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        with_json("POST", "/api/checklist/phase-2/news_feed", "not json".to_string()),
    )
    .await;
    assert_eq!(status, HttpStatus::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn checklist_is_tracked_apart_from_diagnostic_report() {
    let (app, _) = app();
    let (_, before) = send(&app, get("/api/reports/diagnostic")).await;

    let (status, _) = send(
        &app,
        with_json("POST", "/api/checklist/phase-2/news_feed", r#"{"status":"✅"}"#.to_string()),
    )
    .await;
    assert_eq!(status, HttpStatus::OK);

    let (_, after) = send(&app, get("/api/reports/diagnostic")).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn insights_count_visits() {
    let (app, _) = app();

    for uri in [
        "/api/insights/visit/AI%20Chat",
        "/api/insights/visit/AI%20Chat",
        "/api/insights/query/Payments",
    ] {
        let (status, _) = send(&app, with_json("POST", uri, String::new())).await;
        assert_eq!(status, HttpStatus::NO_CONTENT);
    }

    let (status, body) = send(&app, get("/api/insights")).await;
    assert_eq!(status, HttpStatus::OK);
    assert_eq!(body["totalVisits"], 2);
    assert_eq!(body["totalChatQueries"], 1);
    assert_eq!(body["mostActiveTab"], "AI Chat");
}

// =============================================================================
// DashboardConfig
// =============================================================================

#[test]
fn config_defaults() {
    let config = DashboardConfig::default();
    assert_eq!(config.port, 3040);
    assert_eq!(config.host, "127.0.0.1");
    assert!(config.data_dir.is_none());
    assert_eq!(config.addr(), "127.0.0.1:3040");
}
