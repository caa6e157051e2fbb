//! BrowserManager core: launching, connecting and shutting down Chrome.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cdp::{CdpClient, PageSession};

use super::manager_prefs::write_preferences;
use super::{BrowserError, BrowserManagerConfig};

const ENDPOINT_POLL: Duration = Duration::from_millis(200);
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Owns one Chrome instance and the CDP connection to it.
pub struct BrowserManager {
    config: BrowserManagerConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    /// Chrome process handle (if we launched it).
    chrome_process: Mutex<Option<Child>>,
}

impl BrowserManager {
    /// Create a new browser manager.
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome_process: Mutex::new(None),
        }
    }

    /// Manager configuration.
    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Chrome binary to launch: the configured one, else a discovered one.
    pub fn resolve_chrome(&self) -> Result<PathBuf, BrowserError> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => Ok(path.clone()),
            Some(path) => Err(BrowserError::LaunchFailed(format!(
                "{} does not exist",
                path.display()
            ))),
            None => Self::find_chrome().ok_or(BrowserError::ChromeNotFound),
        }
    }

    /// Check if Chrome is already serving the debug endpoint.
    pub async fn is_chrome_running(&self) -> bool {
        reqwest::get(&format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    async fn spawn_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = self.resolve_chrome()?;
        let profile_dir = self.config.get_profile_dir();

        std::fs::create_dir_all(&profile_dir)
            .map_err(|e| BrowserError::Profile(format!("{}: {}", profile_dir.display(), e)))?;
        write_preferences(&profile_dir, self.config.download_dir.as_deref())?;

        info!(
            "Launching {} with profile at {}",
            chrome_path.display(),
            profile_dir.display()
        );

        let child = Command::new(&chrome_path)
            .args(self.config.chrome_args(&profile_dir))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            // A cancelled run drops the manager without reaching shutdown().
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    async fn wait_for_endpoint(&self) -> Result<(), BrowserError> {
        let start = Instant::now();
        while start.elapsed() < self.config.launch_timeout {
            tokio::time::sleep(ENDPOINT_POLL).await;
            if self.is_chrome_running().await {
                return Ok(());
            }
        }
        Err(BrowserError::LaunchFailed(format!(
            "debug endpoint {} did not come up within {:?}",
            self.config.endpoint(),
            self.config.launch_timeout
        )))
    }

    /// Launch Chrome (or reuse one already on the debug port) and connect.
    pub async fn launch(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        if self.is_chrome_running().await {
            warn!(
                "Chrome already running on port {}; reusing it, profile preferences were not applied",
                self.config.debug_port
            );
        } else {
            let child = self.spawn_chrome().await?;
            *self.chrome_process.lock().await = Some(child);

            if let Err(e) = self.wait_for_endpoint().await {
                self.kill_chrome().await;
                return Err(e);
            }
        }

        self.connect().await
    }

    /// Connect to a Chrome that is already serving the debug endpoint.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        let mut slot = self.client.write().await;
        if slot.is_some() {
            return Ok(());
        }

        let client = CdpClient::connect(&self.config.endpoint(), self.config.command_timeout).await?;
        info!("Connected to {} at {}", client.product(), self.config.endpoint());
        *slot = Some(Arc::new(client));
        Ok(())
    }

    /// Whether a CDP connection is open.
    pub async fn is_connected(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// Get the CDP client.
    pub async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Open a page to drive. The blank tab Chrome starts with is reused.
    pub async fn new_page(&self) -> Result<PageSession, BrowserError> {
        let client = self.client().await?;

        let blank = client
            .list_pages()
            .await
            .unwrap_or_default()
            .into_iter()
            .find(|p| p.page_type == "page" && p.url == "about:blank");

        let session = match blank {
            Some(page) => {
                debug!("Reusing blank tab {}", page.id);
                client.attach_page(&page.id).await?
            }
            None => client.new_page().await?,
        };
        Ok(session)
    }

    /// Send downloads to `dir` without prompting, creating it if needed.
    pub async fn set_download_dir(&self, dir: &Path) -> Result<(), BrowserError> {
        std::fs::create_dir_all(dir)
            .map_err(|e| BrowserError::ActionFailed(format!("{}: {}", dir.display(), e)))?;
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

        let client = self.client().await?;
        client
            .set_download_behavior(&dir.display().to_string())
            .await?;
        Ok(())
    }

    /// Drop the connection but leave Chrome running.
    pub async fn detach(&self) {
        let _ = self.client.write().await.take();
        if let Some(child) = self.chrome_process.lock().await.take() {
            // The handle kills on drop; leak it so the browser outlives us.
            std::mem::forget(child);
        }
        info!("Detached from Chrome, browser left open");
    }

    /// Close Chrome if we launched it and drop the connection.
    pub async fn shutdown(&self) -> Result<(), BrowserError> {
        let client = self.client.write().await.take();
        let launched = self.chrome_process.lock().await.is_some();

        if let Some(client) = client {
            if launched {
                if let Err(e) = client.close_browser().await {
                    warn!("Browser.close failed: {}", e);
                }
            }
        }

        self.kill_chrome().await;
        info!("Browser shut down");
        Ok(())
    }

    async fn kill_chrome(&self) {
        let Some(mut child) = self.chrome_process.lock().await.take() else {
            return;
        };

        match tokio::time::timeout(EXIT_GRACE, child.wait()).await {
            Ok(Ok(status)) => debug!("Chrome exited with {}", status),
            _ => {
                info!("Killing Chrome...");
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill Chrome: {}", e);
                }
            }
        }
    }
}
