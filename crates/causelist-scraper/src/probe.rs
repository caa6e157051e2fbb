//! Standalone probe of the cause list site.
//!
//! Performs the run bootstrap, switches into the iframe, waits for one
//! element and then keeps the browser open for inspection.

use std::time::Duration;

use causelist_config::Config;
use serde::Serialize;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::error::ScraperError;
use crate::session::ScrapeSession;

/// What the probe observed.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub frame_url: String,
    pub element_selector: String,
    /// How long the browser was actually held open.
    pub held: Duration,
}

/// Probe the site, holding the browser open for `hold` or until Ctrl-C.
pub async fn probe(config: &Config, hold: Duration) -> Result<ProbeReport, ScraperError> {
    let span = info_span!("probe", run_id = %Uuid::new_v4());
    async move {
        let session = ScrapeSession::start(config).await?;
        let result = inspect(&session, &config.probe.element_selector).await;

        let report = match result {
            Ok(frame_url) => {
                let held = hold_open(hold).await;
                Ok(ProbeReport {
                    frame_url,
                    element_selector: config.probe.element_selector.clone(),
                    held,
                })
            }
            Err(e) => Err(e),
        };

        session.finish(config.browser.keep_open).await;
        report
    }
    .instrument(span)
    .await
}

async fn inspect(session: &ScrapeSession, selector: &str) -> Result<String, ScraperError> {
    let tree = session.page().frame_tree().await?;
    info!("Page has {} frame(s)", tree.frame_count());

    let frame = session.enter_frame().await?;

    info!("Looking for element '{}'...", selector);
    frame
        .wait_for_selector(selector, session.wait_timeout())
        .await?;
    info!("SUCCESS: element '{}' found inside the iframe", selector);

    Ok(frame.url().await?)
}

async fn hold_open(hold: Duration) -> Duration {
    let start = tokio::time::Instant::now();
    info!("Holding the browser open for {}s (Ctrl-C to release)...", hold.as_secs());

    tokio::select! {
        _ = tokio::time::sleep(hold) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted, releasing the browser"),
    }

    start.elapsed()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[tokio::test]
    async fn test_hold_open_waits() {
        let held = hold_open(Duration::from_millis(30)).await;
        assert!(held >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_probe_without_browser_fails() {
        let mut config = Config::default();
        config.browser.debug_port = 9;
        config.browser.chrome_path = Some(PathBuf::from("/nonexistent/chrome"));

        let err = probe(&config, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, ScraperError::Browser(_)));
    }
}
