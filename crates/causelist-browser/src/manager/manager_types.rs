//! Browser manager type definitions and configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::cdp::CdpError;

/// Browser manager errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Frame not available: {0}")]
    FrameNotAvailable(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Browser profile error: {0}")]
    Profile(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::ChromeNotAvailable(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::NavigationFailed(msg) => BrowserError::NavigationFailed(msg),
            CdpError::ElementNotFound(msg) => BrowserError::ElementNotFound(msg),
            CdpError::FrameNotAvailable(msg) => BrowserError::FrameNotAvailable(msg),
            CdpError::JavaScript(msg) => BrowserError::ActionFailed(format!("JS error: {}", msg)),
            CdpError::Timeout(msg) => BrowserError::Timeout(msg),
            CdpError::SessionClosed => BrowserError::NotConnected,
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}

/// Browser configuration.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// Explicit Chrome binary; searched for when `None`.
    pub chrome_path: Option<PathBuf>,
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Whether to run Chrome in headless mode.
    pub headless: bool,
    /// Open the window maximized.
    pub start_maximized: bool,
    /// Profile directory.
    pub profile_dir: Option<PathBuf>,
    /// Where Chrome saves downloads.
    pub download_dir: Option<PathBuf>,
    /// How long to wait for the debug endpoint after spawning Chrome.
    pub launch_timeout: Duration,
    /// How long to wait for any single CDP response.
    pub command_timeout: Duration,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            debug_port: 9222,
            headless: false,
            start_maximized: true,
            profile_dir: None,
            download_dir: None,
            launch_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
        }
    }
}

impl BrowserManagerConfig {
    /// Get the profile directory, falling back to `~/.causelist/browser-profile`.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".causelist")
                .join("browser-profile")
        })
    }

    /// Get the CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }

    /// Command line switches for a Chrome using `profile_dir`.
    pub fn chrome_args(&self, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debug_port),
            format!("--user-data-dir={}", profile_dir.display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
            // Hides navigator.webdriver and the "controlled by automated
            // software" infobar. --enable-automation is never passed.
            "--disable-blink-features=AutomationControlled".to_string(),
            "--disable-infobars".to_string(),
            // Keep cross-origin iframes in the page's renderer.
            "--disable-site-isolation-trials".to_string(),
            "--disable-features=IsolateOrigins,site-per-process".to_string(),
        ];

        if self.start_maximized {
            args.push("--start-maximized".to_string());
        } else {
            args.push("--window-size=1366,900".to_string());
        }

        if self.headless {
            args.push("--headless=new".to_string());
        }

        args.push("about:blank".to_string());
        args
    }
}
