//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::loader::ConfigLoader;

/// Default cause list page of the New Delhi district courts.
pub const DEFAULT_SITE_URL: &str = "https://newdelhi.dcourts.gov.in/cause-list-%e2%81%84-daily-board/";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub stealth: StealthConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Apply tilde expansion to every path-valued setting.
    pub(crate) fn expand_paths(&mut self) {
        fn expand(path: &mut PathBuf) {
            if let Some(s) = path.to_str() {
                *path = PathBuf::from(ConfigLoader::expand_path(s));
            }
        }

        expand(&mut self.download.directory);
        if let Some(p) = self.browser.chrome_path.as_mut() {
            expand(p);
        }
        if let Some(p) = self.browser.profile_dir.as_mut() {
            expand(p);
        }
        if let Some(p) = self.logging.directory.as_mut() {
            expand(p);
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Chrome launch and connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Explicit Chrome executable. Auto-detected when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default)]
    pub headless: bool,

    #[serde(default = "default_true")]
    pub start_maximized: bool,

    /// Persistent profile directory. Defaults to `~/.causelist/browser-profile`.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    /// Leave Chrome running after a run finishes, for debugging.
    #[serde(default)]
    pub keep_open: bool,

    #[serde(default = "default_launch_timeout")]
    pub launch_timeout_secs: u64,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            debug_port: default_debug_port(),
            headless: false,
            start_maximized: true,
            profile_dir: None,
            keep_open: false,
            launch_timeout_secs: default_launch_timeout(),
            command_timeout_secs: default_command_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_debug_port() -> u16 {
    9222
}

fn default_launch_timeout() -> u64 {
    10
}

fn default_command_timeout() -> u64 {
    30
}

/// Fingerprint overrides installed before any page script runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StealthConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    #[serde(default = "default_vendor")]
    pub vendor: String,

    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default = "default_webgl_vendor")]
    pub webgl_vendor: String,

    #[serde(default = "default_renderer")]
    pub renderer: String,

    #[serde(default = "default_true")]
    pub fix_hairline: bool,
}

impl Default for StealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            languages: default_languages(),
            vendor: default_vendor(),
            platform: default_platform(),
            webgl_vendor: default_webgl_vendor(),
            renderer: default_renderer(),
            fix_hairline: true,
        }
    }
}

fn default_languages() -> Vec<String> {
    vec!["en-US".to_string(), "en".to_string()]
}

fn default_vendor() -> String {
    "Google Inc.".to_string()
}

fn default_platform() -> String {
    "Win32".to_string()
}

fn default_webgl_vendor() -> String {
    "Intel Inc.".to_string()
}

fn default_renderer() -> String {
    "Intel Iris OpenGL Engine".to_string()
}

/// Target site structure. Selectors are CSS selectors evaluated inside the
/// cause list iframe, except `iframe_selector` which is evaluated on the
/// top-level page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_url")]
    pub url: String,

    #[serde(default = "default_iframe_selector")]
    pub iframe_selector: String,

    #[serde(default = "default_complex_selector")]
    pub complex_selector: String,

    #[serde(default = "default_date_selector")]
    pub date_selector: String,

    #[serde(default = "default_submit_selector")]
    pub submit_selector: String,

    #[serde(default = "default_pdf_link_selector")]
    pub pdf_link_selector: String,

    /// `chrono` format string used when typing the date into the site.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            iframe_selector: default_iframe_selector(),
            complex_selector: default_complex_selector(),
            date_selector: default_date_selector(),
            submit_selector: default_submit_selector(),
            pdf_link_selector: default_pdf_link_selector(),
            date_format: default_date_format(),
            wait_timeout_secs: default_wait_timeout(),
        }
    }
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_iframe_selector() -> String {
    "iframe".to_string()
}

fn default_complex_selector() -> String {
    "select".to_string()
}

fn default_date_selector() -> String {
    "input[name*='date' i], input[type='date']".to_string()
}

fn default_submit_selector() -> String {
    "button[type='submit'], input[type='submit']".to_string()
}

fn default_pdf_link_selector() -> String {
    "a[href*='.pdf' i]".to_string()
}

fn default_date_format() -> String {
    "%d-%m-%Y".to_string()
}

fn default_wait_timeout() -> u64 {
    30
}

/// Download target and completion tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_dir")]
    pub directory: PathBuf,

    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_secs: u64,

    /// Rename finished files to `<Complex>_<date>_<n>.pdf`.
    #[serde(default = "default_true")]
    pub rename: bool,

    #[serde(default = "default_true")]
    pub screenshot_on_error: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: default_download_dir(),
            completion_timeout_secs: default_completion_timeout(),
            rename: true,
            screenshot_on_error: true,
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Court PDFs")
}

fn default_completion_timeout() -> u64 {
    120
}

/// Standalone probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Element to look for inside the iframe.
    #[serde(default = "default_complex_selector")]
    pub element_selector: String,

    /// How long to keep the browser open after the probe.
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            element_selector: default_complex_selector(),
            hold_secs: default_hold_secs(),
        }
    }
}

fn default_hold_secs() -> u64 {
    300
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Rolling log directory. Defaults to `~/.causelist/logs`.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    pub fn log_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".causelist")
                .join("logs")
        })
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
