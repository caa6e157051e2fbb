//! Browser bootstrap shared by runs and the probe.

use std::path::{Path, PathBuf};
use std::time::Duration;

use causelist_browser::{
    BrowserManager, BrowserManagerConfig, FrameContext, PageSession, StealthProfile,
};
use causelist_config::{Config, StealthConfig};
use tracing::{info, warn};

use crate::error::ScraperError;

/// Browser settings for a run.
pub fn manager_config(config: &Config) -> BrowserManagerConfig {
    let browser = &config.browser;
    BrowserManagerConfig {
        chrome_path: browser.chrome_path.clone(),
        debug_port: browser.debug_port,
        headless: browser.headless,
        start_maximized: browser.start_maximized,
        profile_dir: browser.profile_dir.clone(),
        download_dir: Some(config.download.directory.clone()),
        launch_timeout: Duration::from_secs(browser.launch_timeout_secs),
        command_timeout: Duration::from_secs(browser.command_timeout_secs),
    }
}

/// Stealth profile for a run, or `None` when disabled.
pub fn stealth_profile(stealth: &StealthConfig) -> Option<StealthProfile> {
    stealth.enabled.then(|| StealthProfile {
        languages: stealth.languages.clone(),
        vendor: stealth.vendor.clone(),
        platform: stealth.platform.clone(),
        webgl_vendor: stealth.webgl_vendor.clone(),
        renderer: stealth.renderer.clone(),
        fix_hairline: stealth.fix_hairline,
    })
}

/// Create the download directory if it is missing.
pub(crate) fn ensure_download_dir(dir: &Path) -> Result<(), ScraperError> {
    std::fs::create_dir_all(dir).map_err(|source| ScraperError::DownloadDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// A launched browser with one page on the cause list site.
pub struct ScrapeSession {
    manager: BrowserManager,
    page: PageSession,
    iframe_selector: String,
    wait_timeout: Duration,
}

impl ScrapeSession {
    /// Launch Chrome, mask automation, and open the cause list page.
    ///
    /// The browser is shut down again if any step fails.
    pub async fn start(config: &Config) -> Result<Self, ScraperError> {
        let manager = BrowserManager::new(manager_config(config));

        match Self::open(&manager, config).await {
            Ok(page) => Ok(Self {
                manager,
                page,
                iframe_selector: config.site.iframe_selector.clone(),
                wait_timeout: Duration::from_secs(config.site.wait_timeout_secs),
            }),
            Err(e) => {
                if let Err(close_err) = manager.shutdown().await {
                    warn!("Failed to shut down browser: {}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn open(manager: &BrowserManager, config: &Config) -> Result<PageSession, ScraperError> {
        info!("Initializing browser...");
        manager.launch().await?;
        manager.set_download_dir(&config.download.directory).await?;
        info!("Browser initialized");

        let page = manager.new_page().await?;

        if let Some(profile) = stealth_profile(&config.stealth) {
            let client = manager.client().await?;
            profile.apply(&page, client.user_agent()).await?;
            info!("Stealth settings applied");
        }

        info!("Navigating to {}...", config.site.url);
        page.navigate(
            &config.site.url,
            Duration::from_secs(config.site.wait_timeout_secs),
        )
        .await?;
        info!("Page loaded");

        Ok(page)
    }

    /// The page on the cause list site.
    pub fn page(&self) -> &PageSession {
        &self.page
    }

    /// Timeout for waiting on page elements.
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Switch into the iframe that hosts the search form.
    pub async fn enter_frame(&self) -> Result<FrameContext<'_>, ScraperError> {
        info!("Looking for the iframe...");
        let frame = self
            .page
            .wait_for_frame(&self.iframe_selector, self.wait_timeout)
            .await?;
        info!("Switched to iframe successfully");
        Ok(frame)
    }

    /// Save a screenshot of the page into `dir`, logging rather than
    /// failing when that is not possible.
    pub async fn capture_error(&self, dir: &Path, label: &str) -> Option<PathBuf> {
        let path = dir.join(format!("error_{}.png", label));
        match self.page.save_screenshot(&path).await {
            Ok(()) => {
                info!("Saved error screenshot to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Could not capture error screenshot: {}", e);
                None
            }
        }
    }

    /// Shut the browser down, or leave it open when `keep_open` is set.
    pub async fn finish(self, keep_open: bool) {
        if keep_open {
            info!("Browser will remain open for debugging");
            self.manager.detach().await;
            return;
        }

        if let Err(e) = self.manager.shutdown().await {
            warn!("Failed to shut down browser: {}", e);
        }
    }
}
