//! Scraper error types.

use std::path::PathBuf;
use std::time::Duration;

use causelist_browser::{BrowserError, CdpError};
use thiserror::Error;

/// Errors from a cause list run or probe.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// The request itself is unusable; nothing was started.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Page error: {0}")]
    Page(#[from] CdpError),

    #[error("Invalid site date format '{0}'")]
    DateFormat(String),

    #[error("No cause list PDFs found for {complex} on {date}")]
    NoCauseLists { complex: String, date: String },

    #[error("Downloads incomplete after {timeout:?}: {completed} of {expected} finished")]
    DownloadTimeout {
        expected: usize,
        completed: usize,
        timeout: Duration,
    },

    #[error("Download directory {path}: {source}")]
    DownloadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScraperError {
    /// Whether the caller sent bad input, as opposed to the run failing.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, ScraperError::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_request_display() {
        let err = ScraperError::InvalidRequest("Date is required".to_string());
        assert_eq!(err.to_string(), "Date is required");
        assert!(err.is_invalid_request());
    }

    #[test]
    fn test_browser_error_keeps_source() {
        let err = ScraperError::from(BrowserError::ChromeNotFound);
        assert!(!err.is_invalid_request());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_download_timeout_display() {
        let err = ScraperError::DownloadTimeout {
            expected: 3,
            completed: 1,
            timeout: Duration::from_secs(120),
        };
        assert_eq!(
            err.to_string(),
            "Downloads incomplete after 120s: 1 of 3 finished"
        );
    }
}
