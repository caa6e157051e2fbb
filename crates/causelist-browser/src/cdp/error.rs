//! CDP error types.

use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not running with remote debugging on the endpoint.
    #[error("Chrome not available at {0}")]
    ChromeNotAvailable(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Navigation failed.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Element not found.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Frame not found or not yet loaded.
    #[error("Frame not available: {0}")]
    FrameNotAvailable(String),

    /// JavaScript execution error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// Timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Session closed.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CdpError {
    /// Whether the error means the execution context went away, which
    /// happens when a frame navigates to a new document.
    pub fn is_context_lost(&self) -> bool {
        match self {
            CdpError::Protocol { message, .. } => {
                message.contains("Cannot find context")
                    || message.contains("Execution context was destroyed")
                    || message.contains("No frame")
            }
            CdpError::JavaScript(text) => text.contains("Execution context was destroyed"),
            _ => false,
        }
    }

    /// Whether the error comes from the DOM being replaced under a query,
    /// so that retrying against the new document can succeed.
    pub fn is_document_churn(&self) -> bool {
        if self.is_context_lost() {
            return true;
        }
        match self {
            CdpError::Protocol { message, .. } => {
                message.contains("Could not find node with given id")
                    || message.contains("No node with given id found")
                    || message.contains("does not belong to the document")
                    || message.contains("Document needs to be requested first")
            }
            _ => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}
