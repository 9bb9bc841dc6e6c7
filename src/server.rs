//! Read-only dashboard server.
//!
//! Serves a single HTML page that polls the JSON API, plus the API itself.
//! The server never writes; incidents arrive through `incsim generate`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Dashboard page |
//! | `GET`  | `/api/incidents?limit=N` | Most recent structured rows |
//! | `GET`  | `/api/incident/{id}` | Stored document plus provider notes |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "incident not found: INC0000AB12" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `store_error` (500).

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use incident_sim_core::adapter::{DocumentRecord, StructuredRecord};
use incident_sim_core::error::SinkError;
use incident_sim_core::sink::{DocumentLookup, RecentRecords};
use incident_sim_core::ProviderNote;

use crate::config::Config;
use crate::sqlite_store::{SqliteDocumentSink, SqliteStructuredSink};

/// Upper bound on `?limit=` regardless of what the client asks for.
const MAX_LIMIT: usize = 500;

/// Shared state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub recent: Arc<dyn RecentRecords>,
    pub documents: Arc<dyn DocumentLookup>,
    pub recent_limit: usize,
    pub refresh_secs: u64,
}

/// Open both stores and serve until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let structured = SqliteStructuredSink::open(config).await?;
    let documents = SqliteDocumentSink::open(config).await?;

    let state = AppState {
        recent: Arc::new(structured),
        documents: Arc::new(documents),
        recent_limit: config.server.recent_limit,
        refresh_secs: config.server.refresh_secs,
    };

    let app = router(state);
    let bind_addr = &config.server.bind;
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!(addr = %bind_addr, "dashboard listening");
    println!("Dashboard listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/api/incidents", get(handle_recent))
        .route("/api/incident/{id}", get(handle_incident))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

impl From<SinkError> for AppError {
    fn from(e: SinkError) -> Self {
        tracing::error!(error = %e, "store read failed");
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "store_error".to_string(),
            message: e.to_string(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/incidents ============

#[derive(Deserialize)]
struct RecentQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct RecentResponse {
    total: usize,
    incidents: Vec<StructuredRecord>,
}

async fn handle_recent(
    State(state): State<AppState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<RecentResponse>, AppError> {
    let Query(q) = query.map_err(|e| bad_request(e.body_text()))?;
    let limit = q.limit.unwrap_or(state.recent_limit);
    if limit == 0 {
        return Err(bad_request("limit must be >= 1"));
    }
    let incidents = state.recent.recent(limit.min(MAX_LIMIT)).await?;
    let total = state.recent.count().await?;
    Ok(Json(RecentResponse { total, incidents }))
}

// ============ GET /api/incident/{id} ============

#[derive(Serialize)]
struct IncidentResponse {
    document: DocumentRecord,
    notes: Vec<ProviderNote>,
}

async fn handle_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IncidentResponse>, AppError> {
    let document = state
        .documents
        .find(&id)
        .await?
        .ok_or_else(|| not_found(format!("incident not found: {}", id)))?;
    let notes = state.documents.notes(&id).await?;
    Ok(Json(IncidentResponse { document, notes }))
}

// ============ GET / ============

async fn handle_index(State(state): State<AppState>) -> Html<String> {
    Html(
        INDEX_HTML
            .replace("{{REFRESH_MS}}", &(state.refresh_secs * 1000).to_string())
            .replace("{{LIMIT}}", &state.recent_limit.to_string()),
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Richmond EMS Incident Dashboard</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 2rem; background: #f6f7f9; }
  h1 { font-size: 1.4rem; }
  table { border-collapse: collapse; width: 100%; background: #fff; }
  th, td { padding: .4rem .6rem; border-bottom: 1px solid #e3e5e8; text-align: left; }
  tr:hover { background: #eef3ff; cursor: pointer; }
  .p1 { color: #b00020; font-weight: 700; } .p2 { color: #d35400; }
  .p3 { color: #b7950b; } .p4, .p5 { color: #555; }
  #detail { white-space: pre-wrap; background: #fff; padding: 1rem; margin-top: 1rem; }
</style>
</head>
<body>
<h1>Richmond EMS Incidents <small id="total"></small></h1>
<table>
  <thead><tr><th>ID</th><th>Priority</th><th>Type</th><th>Area</th><th>Patient</th><th>Call time</th></tr></thead>
  <tbody id="rows"></tbody>
</table>
<div id="detail"></div>
<script>
const REFRESH_MS = {{REFRESH_MS}};
const LIMIT = {{LIMIT}};
function esc(s) { const d = document.createElement('div'); d.textContent = String(s); return d.innerHTML; }
async function refresh() {
  try {
    const res = await fetch('/api/incidents?limit=' + LIMIT);
    const data = await res.json();
    document.getElementById('total').textContent = '(' + data.total + ' stored)';
    document.getElementById('rows').innerHTML = data.incidents.map(r =>
      '<tr onclick="show(\'' + esc(r.incident_id) + '\')">' +
      '<td>' + esc(r.incident_id) + '</td>' +
      '<td class="p' + r.priority + '">P' + r.priority + '</td>' +
      '<td>' + esc(r.emergency_type) + '</td>' +
      '<td>' + esc(r.location_area) + '</td>' +
      '<td>' + esc(r.caller_age) + ' ' + esc(r.caller_sex) + ', ' + esc(r.mental_status) + '</td>' +
      '<td>' + esc(r.call_timestamp) + '</td></tr>').join('');
  } catch (e) { console.error(e); }
}
async function show(id) {
  const res = await fetch('/api/incident/' + encodeURIComponent(id));
  document.getElementById('detail').textContent = JSON.stringify(await res.json(), null, 2);
}
refresh();
setInterval(refresh, REFRESH_MS);
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use incident_sim_core::factory::IncidentFactory;
    use incident_sim_core::memory::InMemorySink;
    use incident_sim_core::sink::save_incident;
    use incident_sim_core::GenerationContext;

    async fn spawn_dashboard(incidents: usize) -> String {
        let sink = Arc::new(InMemorySink::new());
        let mut ctx = GenerationContext::seeded(17);
        for _ in 0..incidents {
            let inc = IncidentFactory::new().generate(&mut ctx).unwrap();
            assert!(save_incident(&inc, sink.as_ref(), sink.as_ref()).await.is_complete());
        }
        let state = AppState {
            recent: sink.clone(),
            documents: sink,
            recent_limit: 20,
            refresh_secs: 5,
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn get_json(url: String) -> (u16, serde_json::Value) {
        let resp = reqwest::get(url).await.unwrap();
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "got {}", content_type);
        (status, resp.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_recent_honours_limit() {
        let base = spawn_dashboard(3).await;
        let (status, body) = get_json(format!("{}/api/incidents?limit=2", base)).await;
        assert_eq!(status, 200);
        assert_eq!(body["total"], 3);
        assert_eq!(body["incidents"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_limit_uses_error_body() {
        let base = spawn_dashboard(1).await;
        let (status, body) = get_json(format!("{}/api/incidents?limit=abc", base)).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(body["error"]["message"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let base = spawn_dashboard(1).await;
        let (status, body) = get_json(format!("{}/api/incidents?limit=0", base)).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_missing_incident_is_not_found() {
        let base = spawn_dashboard(0).await;
        let (status, body) = get_json(format!("{}/api/incident/INC00000000", base)).await;
        assert_eq!(status, 404);
        assert_eq!(body["error"]["code"], "not_found");
    }
}
