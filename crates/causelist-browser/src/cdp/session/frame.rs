//! Iframe access for CDP page session.
//!
//! A [`FrameContext`] owns an isolated JavaScript world created inside a
//! child frame. Scripts evaluated through it see the frame's DOM, not the
//! top-level page's. When the frame navigates its world is destroyed; the
//! context recreates it transparently on the next call.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::cdp::error::CdpError;

use super::core::PageSession;
use super::navigation::POLL_INTERVAL;

const WORLD_NAME: &str = "causelist";

/// Scripting handle bound to one child frame of a page.
pub struct FrameContext<'a> {
    session: &'a PageSession,
    frame_id: String,
    context_id: AtomicI64,
}

impl PageSession {
    /// Wait for an iframe matching `selector` to exist and finish loading,
    /// then return a context that evaluates inside it.
    pub async fn wait_for_frame(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<FrameContext<'_>, CdpError> {
        let start = Instant::now();

        loop {
            match self.try_frame(selector).await {
                Ok(Some(frame)) => {
                    debug!("Switched into frame {} ({})", frame.frame_id, selector);
                    return Ok(frame);
                }
                Ok(None) => {}
                // The page is still replacing its document.
                Err(e) if e.is_document_churn() => trace!("Frame not ready: {}", e),
                Err(e) => return Err(e),
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for frame '{}' timed out",
                    selector
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn try_frame(&self, selector: &str) -> Result<Option<FrameContext<'_>>, CdpError> {
        let Some(node_id) = self.query_selector(selector).await? else {
            return Ok(None);
        };

        let node = self.describe_node(node_id).await?;
        if !node.is_frame_owner() {
            return Err(CdpError::FrameNotAvailable(format!(
                "'{}' matched <{}>, not an iframe",
                selector,
                node.node_name.to_ascii_lowercase()
            )));
        }

        let Some(frame_id) = node.frame_id else {
            return Ok(None);
        };

        let frame = FrameContext {
            session: self,
            frame_id,
            context_id: AtomicI64::new(0),
        };
        frame.reattach().await?;

        if frame.is_ready().await? {
            Ok(Some(frame))
        } else {
            Ok(None)
        }
    }
}

impl<'a> FrameContext<'a> {
    /// Frame ID.
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Page session the frame belongs to.
    pub fn session(&self) -> &'a PageSession {
        self.session
    }

    /// Create a fresh isolated world in the frame.
    pub async fn reattach(&self) -> Result<(), CdpError> {
        let result = self
            .session
            .call(
                "Page.createIsolatedWorld",
                Some(json!({
                    "frameId": self.frame_id,
                    "worldName": WORLD_NAME,
                    "grantUniveralAccess": true,
                })),
            )
            .await?;

        let context_id = result["executionContextId"].as_i64().ok_or_else(|| {
            CdpError::InvalidResponse("Missing executionContextId".to_string())
        })?;
        self.context_id.store(context_id, Ordering::SeqCst);
        trace!("Frame {} bound to context {}", self.frame_id, context_id);
        Ok(())
    }

    /// Evaluate an expression inside the frame.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let context_id = self.context_id.load(Ordering::SeqCst);
        match self
            .session
            .evaluate_in(expression, Some(context_id))
            .await
        {
            Err(e) if e.is_context_lost() => {
                debug!("Frame {} navigated, recreating world", self.frame_id);
                self.reattach().await?;
                self.session
                    .evaluate_in(expression, Some(self.context_id.load(Ordering::SeqCst)))
                    .await
            }
            other => other,
        }
    }

    /// Whether the frame holds a real, loaded document.
    pub async fn is_ready(&self) -> Result<bool, CdpError> {
        let value = self
            .evaluate(
                "document.location.href !== 'about:blank' && \
                 (document.readyState === 'complete' || document.readyState === 'interactive')",
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Current URL of the frame's document.
    pub async fn url(&self) -> Result<String, CdpError> {
        let value = self.evaluate("document.location.href").await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    /// Whether an element matching `selector` exists in the frame.
    pub async fn exists(&self, selector: &str) -> Result<bool, CdpError> {
        let value = self
            .evaluate(&format!(
                "document.querySelector({}) !== null",
                js_str(selector)
            ))
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Wait for an element matching `selector` to appear in the frame.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            match self.exists(selector).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) if e.is_context_lost() => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' in frame timed out",
                    selector
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Pick the `<option>` of a `<select>` whose text matches `text` and
    /// fire the change events the page listens for. Returns the option value.
    pub async fn select_option_by_text(
        &self,
        selector: &str,
        text: &str,
    ) -> Result<String, CdpError> {
        let value = self
            .evaluate(&select_option_script(selector, text))
            .await?;

        match value {
            Value::String(v) => Ok(v),
            _ => Err(CdpError::ElementNotFound(format!(
                "option '{}' in '{}'",
                text, selector
            ))),
        }
    }

    /// Set the value of an input and fire input/change events.
    pub async fn set_value(&self, selector: &str, value: &str) -> Result<(), CdpError> {
        let found = self.evaluate(&set_value_script(selector, value)).await?;
        if found.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(CdpError::ElementNotFound(selector.to_string()))
        }
    }

    /// Click the first element matching `selector`.
    pub async fn click(&self, selector: &str) -> Result<(), CdpError> {
        let found = self
            .evaluate(&format!(
                "(() => {{ const el = document.querySelector({}); if (!el) return false; el.click(); return true; }})()",
                js_str(selector)
            ))
            .await?;
        if found.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(CdpError::ElementNotFound(selector.to_string()))
        }
    }

    /// Absolute `href`s of every element matching `selector`, in document
    /// order, without duplicates.
    pub async fn collect_links(&self, selector: &str) -> Result<Vec<String>, CdpError> {
        let value = self
            .evaluate(&format!(
                "Array.from(document.querySelectorAll({})).map(a => a.href).filter(h => !!h)",
                js_str(selector)
            ))
            .await?;

        let mut links: Vec<String> = Vec::new();
        for href in value.as_array().into_iter().flatten().filter_map(Value::as_str) {
            if !links.iter().any(|l| l == href) {
                links.push(href.to_string());
            }
        }
        Ok(links)
    }

    /// Start a browser download of `url` from within the frame.
    pub async fn trigger_download(&self, url: &str) -> Result<(), CdpError> {
        self.evaluate(&download_script(url)).await?;
        Ok(())
    }
}

/// Encode a Rust string as a JavaScript string literal.
pub(super) fn js_str(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

pub(super) fn select_option_script(selector: &str, text: &str) -> String {
    format!(
        r#"(() => {{
    const sel = document.querySelector({selector});
    if (!sel || !sel.options) return null;
    const want = {text}.trim().toLowerCase();
    const norm = o => (o.textContent || '').replace(/\s+/g, ' ').trim().toLowerCase();
    const opts = Array.from(sel.options);
    const opt = opts.find(o => norm(o) === want) || opts.find(o => norm(o).includes(want));
    if (!opt) return null;
    sel.value = opt.value;
    opt.selected = true;
    sel.dispatchEvent(new Event('input', {{ bubbles: true }}));
    sel.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return opt.value;
}})()"#,
        selector = js_str(selector),
        text = js_str(text),
    )
}

pub(super) fn set_value_script(selector: &str, value: &str) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector({selector});
    if (!el) return false;
    el.focus();
    el.value = {value};
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    el.blur();
    return true;
}})()"#,
        selector = js_str(selector),
        value = js_str(value),
    )
}

pub(super) fn download_script(url: &str) -> String {
    format!(
        r#"(() => {{
    const a = document.createElement('a');
    a.href = {url};
    a.download = '';
    a.rel = 'noopener';
    document.body.appendChild(a);
    a.click();
    a.remove();
    return true;
}})()"#,
        url = js_str(url),
    )
}
