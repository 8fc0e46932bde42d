//! HTTP API.
//!
//! `GET /api/jobs?title=...` runs one search per request and answers with
//! the filtered postings as a JSON array. `GET /health` reports liveness.

use crate::error::SearchError;
use crate::search::SearchOrchestrator;
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchOrchestrator>,
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sources: Vec<String>,
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/jobs", get(search_jobs))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

async fn search_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Response, ApiError> {
    let postings = state.search.search(query.title.as_deref()).await?;
    Ok(Json(postings).into_response())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sources: state
            .search
            .sources()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

/// Search failures as HTTP responses. Details stay in the server log.
pub struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            SearchError::MissingTitle => (StatusCode::BAD_REQUEST, "Missing job title"),
            SearchError::Session(_) | SearchError::AllFetchesFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Scraping error")
            }
            SearchError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
