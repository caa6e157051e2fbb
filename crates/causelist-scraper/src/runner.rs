//! The cause list run pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use causelist_browser::FrameContext;
use causelist_config::Config;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use crate::download::{DownloadWatcher, rename_downloads};
use crate::error::ScraperError;
use crate::fetcher::CauseListFetcher;
use crate::request::{CauseListOutcome, CauseListRequest};
use crate::session::{ScrapeSession, ensure_download_dir};

const LINK_POLL: Duration = Duration::from_millis(500);
/// Gap between download clicks so the site does not throttle them.
const DOWNLOAD_SPACING: Duration = Duration::from_millis(300);

/// Runs cause list downloads, one at a time.
pub struct CauseListRunner {
    config: Arc<Config>,
    lock: Mutex<()>,
}

impl CauseListRunner {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download the cause lists for `request`. Concurrent callers wait for
    /// the run in progress to finish.
    pub async fn run(&self, request: &CauseListRequest) -> Result<CauseListOutcome, ScraperError> {
        let _guard = self.lock.lock().await;
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "run",
            %run_id,
            complex = %request.complex,
            date = %request.date
        );

        self.run_exclusive(run_id, request).instrument(span).await
    }

    async fn run_exclusive(
        &self,
        run_id: Uuid,
        request: &CauseListRequest,
    ) -> Result<CauseListOutcome, ScraperError> {
        info!(
            "Received request for Date: {}, Complex: {}",
            request.date, request.complex
        );
        let started = Instant::now();

        let dir = self.config.download.directory.clone();
        ensure_download_dir(&dir)?;

        let session = ScrapeSession::start(&self.config).await?;
        let result = self.drive(&session, run_id, request, &dir).await;

        if let Err(e) = &result {
            error!("Run failed: {}", e);
            if self.config.download.screenshot_on_error {
                session.capture_error(&dir, &run_id.to_string()).await;
            }
        }

        session.finish(self.config.browser.keep_open).await;

        if let Ok(outcome) = &result {
            info!(
                "Run finished in {:.1}s: {}",
                started.elapsed().as_secs_f64(),
                outcome.summary()
            );
        }
        result
    }

    async fn drive(
        &self,
        session: &ScrapeSession,
        run_id: Uuid,
        request: &CauseListRequest,
        dir: &Path,
    ) -> Result<CauseListOutcome, ScraperError> {
        let site = &self.config.site;
        let wait = session.wait_timeout();

        let frame = session.enter_frame().await?;

        frame.wait_for_selector(&site.complex_selector, wait).await?;
        info!("Court complex dropdown found");
        let value = frame
            .select_option_by_text(&site.complex_selector, request.complex.display_name())
            .await?;
        debug!("Selected complex option value {}", value);

        frame.wait_for_selector(&site.date_selector, wait).await?;
        let site_date = request.site_date(&site.date_format)?;
        frame.set_value(&site.date_selector, &site_date).await?;
        debug!("Entered date {}", site_date);

        frame.click(&site.submit_selector).await?;
        info!("Search submitted");

        let links = wait_for_links(&frame, &site.pdf_link_selector, wait).await?;
        if links.is_empty() {
            return Err(ScraperError::NoCauseLists {
                complex: request.complex.to_string(),
                date: request.date.to_string(),
            });
        }
        info!("Found {} cause list PDF link(s)", links.len());

        let watcher = DownloadWatcher::new(dir)?;
        for link in &links {
            debug!("Downloading {}", link);
            frame.trigger_download(link).await?;
            tokio::time::sleep(DOWNLOAD_SPACING).await;
        }

        let timeout = Duration::from_secs(self.config.download.completion_timeout_secs);
        let files = watcher.wait_for(links.len(), timeout).await?;

        let files = if self.config.download.rename {
            rename_downloads(&files, request.complex, request.date)?
        } else {
            files
        };

        Ok(CauseListOutcome {
            run_id,
            complex: request.complex,
            date: request.date,
            directory: dir.to_path_buf(),
            files,
        })
    }
}

/// Poll the frame for PDF links until some appear or `timeout` passes.
/// An empty result means the search produced no cause lists.
async fn wait_for_links(
    frame: &FrameContext<'_>,
    selector: &str,
    timeout: Duration,
) -> Result<Vec<String>, ScraperError> {
    let start = Instant::now();

    loop {
        match frame.collect_links(selector).await {
            Ok(links) if !links.is_empty() => return Ok(links),
            Ok(_) => {}
            // The results page may still be replacing the form.
            Err(e) if e.is_context_lost() => debug!("Frame reloading: {}", e),
            Err(e) => return Err(e.into()),
        }

        if start.elapsed() > timeout {
            return Ok(Vec::new());
        }
        tokio::time::sleep(LINK_POLL).await;
    }
}

#[async_trait]
impl CauseListFetcher for CauseListRunner {
    async fn fetch(&self, request: &CauseListRequest) -> Result<CauseListOutcome, ScraperError> {
        self.run(request).await
    }
}
