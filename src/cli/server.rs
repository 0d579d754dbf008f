//! Fixtures server
//!
//! Serves a JSON array of invoices the way json-server does: `_page` and
//! `_limit` slice the collection, and a `Link` header lists the `first`,
//! `prev`, `next` and `last` pages. Used for local development against
//! the list and browse commands.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result, ResultExt};
use crate::fetch::LIMIT_PARAM;
use crate::pagination::PAGE_PARAM;

const DEFAULT_LIMIT: usize = 10;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// JSON file holding an array of invoices
    pub data: PathBuf,
    /// Port to listen on
    pub port: u16,
}

/// App state shared across handlers
#[derive(Debug)]
struct AppState {
    invoices: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(rename = "_page")]
    page: Option<usize>,
    #[serde(rename = "_limit")]
    limit: Option<usize>,
}

/// Load the fixture collection from disk
pub fn load_fixtures(path: &std::path::Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixtures {}", path.display()))?;
    match serde_json::from_str(&contents)? {
        Value::Array(items) => Ok(items),
        _ => Err(Error::config(format!(
            "{} must contain a JSON array",
            path.display()
        ))),
    }
}

/// Build the fixtures router
pub fn router(invoices: Vec<Value>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::LINK]);

    Router::new()
        .route("/health", get(health))
        .route("/invoices", get(list_invoices))
        .route("/invoices/:id", get(get_invoice))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { invoices }))
}

/// Start the fixtures server
pub async fn serve(config: ServerConfig) -> Result<()> {
    let invoices = load_fixtures(&config.data)?;
    let count = invoices.len();
    let app = router(invoices);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!(
        "Serving {} invoices from {} on http://{}",
        count,
        config.data.display(),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(format!("Failed to bind to port {}: {e}", config.port)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::server(e.to_string()))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// List invoices, paginated when `_page` is given
async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Response {
    let Some(page) = params.page else {
        return Json(state.invoices.clone()).into_response();
    };

    let page = page.max(1);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let total = state.invoices.len();
    let items: Vec<Value> = state
        .invoices
        .iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .cloned()
        .collect();

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let link = link_header(&format!("http://{host}/invoices"), page, limit, total);

    let mut response = Json(items).into_response();
    if let Ok(value) = HeaderValue::from_str(&total.to_string()) {
        response.headers_mut().insert("x-total-count", value);
    }
    if let Some(value) = link.and_then(|l| HeaderValue::from_str(&l).ok()) {
        response.headers_mut().insert(header::LINK, value);
    }
    response
}

/// Fetch one invoice by id
async fn get_invoice(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let found = state.invoices.iter().find(|invoice| match invoice.get("id") {
        Some(Value::String(s)) => *s == id,
        Some(other) => other.to_string() == id,
        None => false,
    });

    match found {
        Some(invoice) => Json(invoice.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

/// Build the `Link` header for a page; `None` for an empty collection
fn link_header(base: &str, page: usize, limit: usize, total: usize) -> Option<String> {
    if total == 0 {
        return None;
    }
    let last = total.div_ceil(limit);
    let url = |p: usize| format!("<{base}?{PAGE_PARAM}={p}&{LIMIT_PARAM}={limit}>");

    let mut parts = vec![format!(r#"{}; rel="first""#, url(1))];
    if page > 1 {
        parts.push(format!(r#"{}; rel="prev""#, url(page - 1)));
    }
    if page < last {
        parts.push(format!(r#"{}; rel="next""#, url(page + 1)));
    }
    parts.push(format!(r#"{}; rel="last""#, url(last)));

    Some(parts.join(", "))
}
