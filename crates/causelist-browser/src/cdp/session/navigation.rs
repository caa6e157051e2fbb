//! Navigation operations for CDP page session.

use std::time::{Duration, Instant};

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Navigate to URL and wait for the document to become ready.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(format!(
                "{}: {}",
                url,
                error.as_str().unwrap_or("Unknown error")
            )));
        }

        let frame_id = result["frameId"]
            .as_str()
            .unwrap_or("main")
            .to_string();

        self.wait_for_load(timeout).await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Wait for page load.
    pub async fn wait_for_load(&self, timeout: Duration) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            match self.evaluate("document.readyState").await {
                Ok(result) => {
                    if let Some(state) = result.as_str() {
                        if state == "complete" || state == "interactive" {
                            return Ok(());
                        }
                    }
                }
                // The old document goes away mid-navigation.
                Err(e) if e.is_context_lost() => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Wait for selector to appear in the top-level document.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<i64, CdpError> {
        let start = Instant::now();

        loop {
            if let Some(node_id) = self.query_selector(selector).await? {
                return Ok(node_id);
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' timed out",
                    selector
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
