//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the population, hello and health endpoints using `tower::ServiceExt::oneshot()`.
//! The export pipeline is replaced by a mock that records what it receives.

use gamedata_gateway::api::{create_app, GatewayState};
use gamedata_gateway::config::{GatewayConfig, SourceMapping, SqlSettings, WarehouseSettings};
use gamedata_gateway::export::{ExportError, ExportManager, ExportRequest, ExportResult};
use gamedata_gateway::{DataInterface, OutputKind, OutputLocation};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ============================================================================
// Mock export pipeline
// ============================================================================

enum MockBehavior {
    Return(ExportResult),
    Fail,
    Panic,
}

struct MockExportManager {
    behavior: MockBehavior,
    received: Mutex<Vec<ExportRequest>>,
}

impl MockExportManager {
    fn new(behavior: MockBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            received: Mutex::new(Vec::new()),
        })
    }

    fn returning(columns: &[&str], row: &[&str]) -> Arc<Self> {
        Self::new(MockBehavior::Return(ExportResult::new(
            columns.iter().map(ToString::to_string).collect(),
            vec![row.iter().map(|v| json!(v)).collect()],
        )))
    }

    fn requests(&self) -> Vec<ExportRequest> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExportManager for MockExportManager {
    async fn execute(&self, request: ExportRequest) -> Result<ExportResult, ExportError> {
        self.received.lock().unwrap().push(request);
        match &self.behavior {
            MockBehavior::Return(result) => Ok(result.clone()),
            MockBehavior::Fail => Err(ExportError::Pipeline(
                "database password rejected for user reader".to_string(),
            )),
            MockBehavior::Panic => panic!("exporter crashed"),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig {
        sql: Some(SqlSettings {
            host: "db.local".to_string(),
            port: 3306,
            user: "reader".to_string(),
            password: None,
        }),
        warehouse: Some(WarehouseSettings {
            project_id: "analytics".to_string(),
            credential_path: None,
        }),
        ..GatewayConfig::default()
    };
    config
        .games
        .insert("VALIDGAME".to_string(), SourceMapping::new("BigQuery"));
    config
        .games
        .insert("SQLGAME".to_string(), SourceMapping::new("MySQL"));
    config
}

fn app_with(manager: Arc<MockExportManager>) -> axum::Router {
    create_app(GatewayState::new(Arc::new(test_config()), manager))
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    send_json(app, "GET", uri).await
}

async fn send_json(app: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// Population endpoint
// ============================================================================

/// Unknown game → ERROR envelope, HTTP 200, pipeline never called.
#[tokio::test]
async fn test_unknown_game_is_error_envelope() {
    let manager = MockExportManager::returning(&["m1"], &["1"]);
    let (status, body) = get_json(app_with(manager.clone()), "/game/UNKNOWNGAME/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["req_type"], "GET");
    assert!(body["val"].is_null());
    assert!(manager.requests().is_empty());
}

/// Full happy path with explicit range and metric list.
#[tokio::test]
async fn test_valid_game_returns_metrics() {
    let manager = MockExportManager::returning(&["m1", "m2"], &["10", "20"]);
    let (status, body) = get_json(
        app_with(manager.clone()),
        "/game/VALIDGAME/metrics?start_datetime=2024-01-01T00:00:00&end_datetime=2024-01-02T00:00:00&metrics=%5Bm1,m2%5D",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["val"], json!({"m1": "10", "m2": "20"}));

    let requests = manager.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert!(matches!(req.interface, DataInterface::Warehouse(_)));
    assert_eq!(
        req.range.start,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    );
    assert_eq!(
        req.range.end,
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap()
    );
    assert_eq!(req.metric_overrides, vec!["m1".to_string(), "m2".to_string()]);
    assert_eq!(req.output_kinds.iter().copied().collect::<Vec<_>>(), vec![OutputKind::Population]);
    assert_eq!(
        req.output_locations.iter().copied().collect::<Vec<_>>(),
        vec![OutputLocation::InMemory]
    );
}

/// Pipeline failure → SERVER_ERROR with a generic message, no internals leaked.
#[tokio::test]
async fn test_export_failure_is_server_error() {
    let manager = MockExportManager::new(MockBehavior::Fail);
    let (status, body) = get_json(app_with(manager), "/game/VALIDGAME/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SERVER_ERROR");
    assert!(body["val"].is_null());
    let msg = body["msg"].as_str().unwrap();
    assert!(msg.contains("Unknown error"));
    assert!(!msg.contains("password"));
}

/// A panic inside the pipeline is caught at the endpoint boundary.
#[tokio::test]
async fn test_export_panic_is_server_error() {
    let manager = MockExportManager::new(MockBehavior::Panic);
    let (status, body) = get_json(app_with(manager), "/game/SQLGAME/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SERVER_ERROR");
    assert!(!body["msg"].as_str().unwrap().contains("exporter crashed"));
}

/// A mapped game whose backend has no settings is a server error, not a crash.
#[tokio::test]
async fn test_missing_backend_settings_is_server_error() {
    let mut config = GatewayConfig::default();
    config
        .games
        .insert("ORPHAN".to_string(), SourceMapping::new("MySQL"));
    let manager = MockExportManager::returning(&["a"], &["1"]);
    let app = create_app(GatewayState::new(Arc::new(config), manager.clone()));

    let (status, body) = get_json(app, "/game/ORPHAN/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SERVER_ERROR");
    assert!(manager.requests().is_empty());
}

/// Empty upstream result → ERROR envelope.
#[tokio::test]
async fn test_empty_result_is_error_envelope() {
    let manager = MockExportManager::new(MockBehavior::Return(ExportResult::default()));
    let (_, body) = get_json(app_with(manager), "/game/VALIDGAME/metrics").await;

    assert_eq!(body["status"], "ERROR");
    assert!(body["val"].is_null());
}

/// Malformed metrics and bad dates fall back to defaults without failing.
#[tokio::test]
async fn test_malformed_params_fall_back_to_defaults() {
    let manager = MockExportManager::returning(&["a"], &["1"]);
    let (_, body) = get_json(
        app_with(manager.clone()),
        "/game/SQLGAME/metrics?metrics=abc&start_datetime=garbage",
    )
    .await;

    assert_eq!(body["status"], "SUCCESS");
    let requests = manager.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].requests_all_metrics());
    assert!(matches!(requests[0].interface, DataInterface::Sql(_)));
    assert_eq!(
        requests[0].range.end - requests[0].range.start,
        chrono::Duration::hours(1)
    );
}

/// `metrics=[]` and a missing argument both ask for every metric.
#[tokio::test]
async fn test_empty_and_missing_metrics_request_all() {
    for uri in ["/game/SQLGAME/metrics?metrics=%5B%5D", "/game/SQLGAME/metrics"] {
        let manager = MockExportManager::returning(&["a"], &["1"]);
        let (_, body) = get_json(app_with(manager.clone()), uri).await;
        assert_eq!(body["status"], "SUCCESS", "{uri}");
        assert!(manager.requests()[0].requests_all_metrics(), "{uri}");
    }
}

// ============================================================================
// Hello + health
// ============================================================================

#[tokio::test]
async fn test_hello_methods() {
    for (method, verb) in [("GET", "GETted"), ("POST", "POSTed"), ("PUT", "PUTted")] {
        let manager = MockExportManager::returning(&[], &[]);
        let (status, body) = send_json(app_with(manager), method, "/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "SUCCESS");
        assert_eq!(body["req_type"], method);
        assert_eq!(body["msg"], format!("Hello! You {verb} successfully!"));
    }
}

#[tokio::test]
async fn test_parameterised_hello() {
    let manager = MockExportManager::returning(&[], &[]);
    let (_, body) = send_json(app_with(manager), "PUT", "/p_hello/Ada").await;
    assert_eq!(body["msg"], "Hello Ada! You PUTted successfully!");
}

#[tokio::test]
async fn test_health_reports_configured_games() {
    let manager = MockExportManager::returning(&[], &[]);
    let (status, body) = get_json(app_with(manager), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["games_configured"], 2);
}
