//! HTTP routes and handlers.
//!
//! ```text
//! GET  /               - Download form
//! POST /download       - Run a download: {date, complexName} -> {status, message}
//! GET  /health         - Liveness and run counters
//! GET  /api/complexes  - Court complex names
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use causelist_scraper::{CauseListRequest, CourtComplex};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{WebError, error_chain};
use crate::state::AppState;

/// Embedded static assets.
#[derive(RustEmbed)]
#[folder = "src/static/"]
struct StaticAssets;

/// Body posted by the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "complexName")]
    pub complex_name: Option<String>,
}

/// Reply to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub status: String,
    pub message: String,
}

impl DownloadResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Create the router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/download", post(download))
        .route("/health", get(health_check))
        .route("/api/complexes", get(list_complexes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve_index() -> impl IntoResponse {
    match StaticAssets::get("index.html") {
        Some(content) => Html(String::from_utf8_lossy(content.data.as_ref()).into_owned()),
        None => Html(
            "<!DOCTYPE html><html><body><p>Form page missing from build.</p></body></html>"
                .to_string(),
        ),
    }
}

async fn download(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DownloadForm>, JsonRejection>,
) -> Result<Json<DownloadResponse>, WebError> {
    let Json(form) = payload.map_err(|rejection| WebError::BadRequest(rejection.body_text()))?;

    let date = form.date.unwrap_or_default();
    let complex_name = form.complex_name.unwrap_or_default();
    info!("Received request for Date: {}, Complex: {}", date, complex_name);

    let request = CauseListRequest::parse(&date, &complex_name)?;

    match state.fetcher.fetch(&request).await {
        Ok(outcome) => {
            state.record_run(true);
            Ok(Json(DownloadResponse::success(outcome.summary())))
        }
        Err(e) => {
            state.record_run(false);
            let err = WebError::from(e);
            if matches!(err, WebError::RunFailed(_)) {
                error!("AN ERROR OCCURRED: {}", error_chain(&err));
            }
            Err(err)
        }
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "runs": {
            "succeeded": state.runs_succeeded(),
            "failed": state.runs_failed(),
        }
    }))
}

async fn list_complexes() -> impl IntoResponse {
    Json(CourtComplex::all().to_vec())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
pub(crate) mod tests;
