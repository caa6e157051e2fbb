//! Core session struct and CDP command dispatch.

use serde_json::{json, Value};
use tracing::debug;

use crate::cdp::client::Transport;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::ScreenshotFormat;

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID.
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// Connection shared with the client.
    pub(super) transport: Transport,
}

impl PageSession {
    /// Create a new page session.
    pub(crate) fn new(target_id: String, session_id: String, transport: Transport) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        self.call("Network.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Register a script that runs in every frame before any page script.
    pub async fn add_script_on_new_document(&self, source: &str) -> Result<String, CdpError> {
        let result = self
            .call(
                "Page.addScriptToEvaluateOnNewDocument",
                Some(json!({"source": source})),
            )
            .await?;

        result["identifier"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing script identifier".to_string()))
    }

    /// Override the user agent, accept-language and platform for this page.
    pub async fn set_user_agent_override(
        &self,
        user_agent: &str,
        accept_language: &str,
        platform: &str,
    ) -> Result<(), CdpError> {
        self.call(
            "Network.setUserAgentOverride",
            Some(json!({
                "userAgent": user_agent,
                "acceptLanguage": accept_language,
                "platform": platform,
            })),
        )
        .await?;
        Ok(())
    }

    /// Take a screenshot, returned base64-encoded.
    pub async fn screenshot(
        &self,
        format: ScreenshotFormat,
        full_page: bool,
    ) -> Result<String, CdpError> {
        let params = json!({
            "format": format,
            "captureBeyondViewport": full_page,
        });

        let result = self.call("Page.captureScreenshot", Some(params)).await?;

        result["data"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))
    }

    /// Take a PNG screenshot and write it to `path`.
    pub async fn save_screenshot(&self, path: &std::path::Path) -> Result<(), CdpError> {
        use base64::Engine;

        let data = self.screenshot(ScreenshotFormat::Png, true).await?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| CdpError::InvalidResponse(format!("Bad screenshot data: {}", e)))?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| CdpError::InvalidResponse(format!("Cannot write screenshot: {}", e)))?;
        debug!("Saved screenshot to {}", path.display());
        Ok(())
    }
}
