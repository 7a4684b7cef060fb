// Dashboard HTTP API server
//
// Provides REST endpoints and SSE streaming for the admin console UI

use crate::checklist::PhaseChecklist;
use crate::dashboard::event_stream::{EventBroadcaster, ReportEvent, ReportEventType};
use crate::dashboard::DashboardConfig;
use crate::insights::BehaviorInsights;
use crate::report::{AnyReport, Report, ReportKind};
use crate::reports::{DiagnosticMetrics, PhaseEntry};
use crate::service::ReportService;
use crate::status::StatusCode;
use crate::storage::KeyValueStore;
use crate::StatusDeckError;
use axum::{
    extract::{Path, State},
    http::StatusCode as HttpStatus,
    response::{
        sse::{Event, KeepAlive},
        Html, IntoResponse, Response, Sse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

type SharedKv = Arc<dyn KeyValueStore>;

/// Dashboard server state
#[derive(Clone)]
pub struct DashboardState {
    pub service: Arc<ReportService>,
    pub checklist: Arc<PhaseChecklist<SharedKv>>,
    pub insights: Arc<BehaviorInsights<SharedKv>>,
    pub broadcaster: EventBroadcaster,
}

impl DashboardState {
    pub fn new(service: Arc<ReportService>, kv: SharedKv, broadcaster: EventBroadcaster) -> Self {
        Self {
            service,
            checklist: Arc::new(PhaseChecklist::new(kv.clone())),
            insights: Arc::new(BehaviorInsights::new(kv)),
            broadcaster,
        }
    }
}

/// Dashboard HTTP server
pub struct DashboardServer {
    config: DashboardConfig,
    state: DashboardState,
}

impl DashboardServer {
    pub fn new(config: DashboardConfig, state: DashboardState) -> Self {
        Self { config, state }
    }

    /// Start the Dashboard server
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.addr();
        info!(
            target: "dashboard",
            addr = %addr,
            "Starting Dashboard server"
        );

        let app = router(self.state);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(
            target: "dashboard",
            url = %format!("http://{}", addr),
            "Dashboard server ready"
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the API router
pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/health", get(health_handler))
        .route("/api/events/stream", get(event_stream_handler))
        .route("/api/reports", get(list_reports_handler))
        .route(
            "/api/reports/:kind",
            get(get_report_handler).put(put_report_handler),
        )
        .route("/api/reports/:kind/metrics", get(report_metrics_handler))
        .route("/api/checklist", get(checklist_handler))
        .route("/api/checklist/:phase/:item", post(set_checklist_item_handler))
        .route("/api/insights", get(insights_handler))
        .route("/api/insights/visit/:tab", post(record_visit_handler))
        .route("/api/insights/query/:tab", post(record_query_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Error body returned by every handler
struct ApiError(StatusDeckError);

impl From<StatusDeckError> for ApiError {
    fn from(err: StatusDeckError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            e if e.is_contract_violation() => HttpStatus::UNPROCESSABLE_ENTITY,
            StatusDeckError::NotFound(_) => HttpStatus::NOT_FOUND,
            StatusDeckError::StoreUnavailable(_) => HttpStatus::SERVICE_UNAVAILABLE,
            _ => HttpStatus::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(target: "dashboard", error = %self.0, "Request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Run a tracker call on the blocking pool; the key-value store does file IO.
async fn blocking<T, F>(call: F) -> ApiResult<T>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| StatusDeckError::StorageError(format!("tracker task failed: {}", e)))?;
    Ok(result?)
}

const INDEX: &str = r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>StatusDeck</title></head><body><h1>StatusDeck admin API</h1><ul><li><a href="/api/reports">/api/reports</a></li><li><a href="/api/checklist">/api/checklist</a></li><li><a href="/api/insights">/api/insights</a></li></ul></body></html>"#;

async fn index_handler() -> Html<&'static str> {
    Html(INDEX)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// SSE endpoint for report update notifications
async fn event_stream_handler(
    State(state): State<DashboardState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    info!(
        target: "dashboard",
        subscribers = state.broadcaster.subscriber_count(),
        "New SSE client connected"
    );

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().event("report").data(json))),
            Err(e) => {
                warn!(target: "dashboard", error = %e, "Failed to serialize event");
                None
            }
        },
        Err(e) => {
            warn!(target: "dashboard", error = %e, "Broadcast error");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn list_reports_handler(State(state): State<DashboardState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.service.summaries().await?))
}

async fn get_report_handler(
    State(state): State<DashboardState>,
    Path(kind): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let kind: ReportKind = kind.parse()?;
    Ok(Json(state.service.get_report(kind).await?))
}

/// Replace a report; the body is the bare report of the kind in the path
async fn put_report_handler(
    State(state): State<DashboardState>,
    Path(kind): Path<String>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    let kind: ReportKind = kind.parse()?;
    let report = AnyReport::from_json(kind, &body)?;
    state.service.update_report(report).await?;
    Ok(HttpStatus::NO_CONTENT)
}

async fn report_metrics_handler(
    State(state): State<DashboardState>,
    Path(kind): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let kind: ReportKind = kind.parse()?;
    Ok(Json(state.service.metrics(kind).await?))
}

#[derive(Serialize)]
struct ChecklistView {
    report: Report<PhaseEntry>,
    metrics: DiagnosticMetrics,
}

async fn checklist_handler(State(state): State<DashboardState>) -> ApiResult<impl IntoResponse> {
    let checklist = state.checklist.clone();
    let report = blocking(move || checklist.load()).await?;
    let metrics = crate::reports::diagnostic::calculate_metrics(&report)?;
    Ok(Json(ChecklistView { report, metrics }))
}

#[derive(Deserialize)]
struct SetItemBody {
    status: StatusCode,
}

async fn set_checklist_item_handler(
    State(state): State<DashboardState>,
    Path((phase, item)): Path<(String, String)>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    let body: SetItemBody = serde_json::from_str(&body).map_err(StatusDeckError::from)?;
    let checklist = state.checklist.clone();
    let report = blocking(move || checklist.set_item(&phase, &item, body.status)).await?;
    let metrics = crate::reports::diagnostic::calculate_metrics(&report)?;

    state.broadcaster.broadcast(ReportEvent {
        timestamp: report.timestamp.clone(),
        event_type: ReportEventType::ChecklistUpdated,
        kind: ReportKind::Diagnostic,
        version: report.version.clone(),
        percent_complete: metrics.percent_complete,
    });

    Ok(Json(ChecklistView { report, metrics }))
}

async fn insights_handler(State(state): State<DashboardState>) -> ApiResult<impl IntoResponse> {
    let insights = state.insights.clone();
    Ok(Json(blocking(move || insights.summary()).await?))
}

async fn record_visit_handler(
    State(state): State<DashboardState>,
    Path(tab): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let insights = state.insights.clone();
    blocking(move || insights.record_visit(&tab)).await?;
    Ok(HttpStatus::NO_CONTENT)
}

async fn record_query_handler(
    State(state): State<DashboardState>,
    Path(tab): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let insights = state.insights.clone();
    blocking(move || insights.record_chat_query(&tab)).await?;
    Ok(HttpStatus::NO_CONTENT)
}
