//! Web error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use causelist_scraper::ScraperError;
use thiserror::Error;

use crate::routes::DownloadResponse;

/// Message shown to the user for any failure inside a run. The details go
/// to the log.
pub const GENERIC_FAILURE: &str = "An error occurred. Check terminal.";

/// Web layer errors.
#[derive(Debug, Error)]
pub enum WebError {
    /// The request could not be turned into a run.
    #[error("{0}")]
    BadRequest(String),

    /// The run itself failed.
    #[error("Run failed: {0}")]
    RunFailed(#[source] ScraperError),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),

    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ScraperError> for WebError {
    fn from(e: ScraperError) -> Self {
        if e.is_invalid_request() {
            WebError::BadRequest(e.to_string())
        } else {
            WebError::RunFailed(e)
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string()),
        };
        (status, Json(DownloadResponse::error(message))).into_response()
    }
}

/// An error and all of its sources, joined with `: `.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // thiserror messages often embed their source already.
        if !chain.ends_with(&text) {
            chain.push_str(": ");
            chain.push_str(&text);
        }
        source = cause.source();
    }
    chain
}
