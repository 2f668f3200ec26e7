//! JSON HTTP API over the search and tab pipelines.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/search` | Search tabs by title, optionally filtered by artist/type |
//! | `POST` | `/tab` | Fetch one tab's cleaned body, chords and metadata |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "upstream_unreachable", "message": "..." } }
//! ```
//!
//! Error codes: `bad_request` (400), `upstream_unreachable` (502),
//! `malformed_upstream_page` (502), `unexpected_store_shape` (500),
//! `missing_required_field` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser clients can
//! call the API directly.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ScrapeError;
use crate::fetch::{HttpPageSource, PageSource};
use crate::models::{SearchQuery, SearchResult, Tab, TabQuery};
use crate::search::search_tabs;
use crate::tab::get_tab;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    /// Where pages come from; one pooled HTTP client in production.
    source: Arc<dyn PageSource>,
}

/// Starts the HTTP server on `[server].bind` using a real HTTP client.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let source = HttpPageSource::new(&config.upstream)?;
    run_server_with_source(config, Arc::new(source)).await
}

/// Starts the server with a caller-supplied [`PageSource`].
///
/// Like [`run_server`], but pages are fetched through `source`, which lets
/// embedders add their own transport.
pub async fn run_server_with_source(
    config: &Config,
    source: Arc<dyn PageSource>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(config, source);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("ugapi listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the route table with CORS and request tracing applied.
pub fn router(config: &Config, source: Arc<dyn PageSource>) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        source,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", post(handle_search))
        .route("/tab", post(handle_tab))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
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

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

impl From<ScrapeError> for AppError {
    fn from(err: ScrapeError) -> Self {
        let status = match &err {
            ScrapeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ScrapeError::UpstreamUnreachable { .. } | ScrapeError::MalformedUpstreamPage(_) => {
                StatusCode::BAD_GATEWAY
            }
            ScrapeError::UnexpectedStoreShape(_) | ScrapeError::MissingRequiredField(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            warn!(code = err.code(), "{}", err);
        }
        AppError {
            status,
            code: err.code().to_string(),
            message: err.to_string(),
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

// ============ POST /search ============

/// Handler for `POST /search`.
///
/// Returns the filtered results in upstream order. An empty array means
/// nothing matched, not an error.
async fn handle_search(
    State(state): State<AppState>,
    body: Result<Json<SearchQuery>, JsonRejection>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    let Json(query) = body?;
    let results = search_tabs(state.source.as_ref(), &state.config, &query).await?;
    Ok(Json(results))
}

// ============ POST /tab ============

/// Handler for `POST /tab`.
async fn handle_tab(
    State(state): State<AppState>,
    body: Result<Json<TabQuery>, JsonRejection>,
) -> Result<Json<Tab>, AppError> {
    let Json(query) = body?;
    let tab = get_tab(state.source.as_ref(), &state.config, &query).await?;
    Ok(Json(tab))
}
