//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo, TargetInfo};
use super::session::PageSession;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
pub(crate) type PendingMap = Arc<Mutex<HashMap<u64, PendingRequest>>>;

/// Pending request waiting for response.
pub(crate) struct PendingRequest {
    pub tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Connection state shared between the client and its page sessions.
#[derive(Clone)]
pub(crate) struct Transport {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    pending: PendingMap,
    request_id: Arc<AtomicU64>,
    command_timeout: Duration,
}

impl Transport {
    /// Split a connected websocket into a transport and the task that
    /// routes its incoming messages.
    pub(crate) fn start(
        ws_stream: WsStream,
        command_timeout: Duration,
    ) -> (Self, tokio::task::JoinHandle<()>) {
        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                CdpClient::receive_loop(ws_source, pending).await;
            })
        };

        let transport = Self {
            ws_tx: Arc::new(tokio::sync::Mutex::new(ws_sink)),
            pending,
            request_id: Arc::new(AtomicU64::new(1)),
            command_timeout,
        };
        (transport, recv_task)
    }

    /// Send a command, optionally scoped to a target session, and wait for
    /// its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.command_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }
}

/// CDP client for browser automation.
///
/// Connects to Chrome via WebSocket and provides methods for browser control.
pub struct CdpClient {
    /// HTTP endpoint for page discovery.
    http_endpoint: String,
    /// Browser WebSocket URL.
    browser_ws_url: String,
    /// Browser product string, e.g. `Chrome/126.0.6478.126`.
    product: String,
    /// Default user agent reported by the browser.
    user_agent: String,
    transport: Transport,
    /// Background task handle.
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Chrome debugging endpoint (e.g., "http://localhost:9222")
    /// * `command_timeout` - How long to wait for any single CDP response
    pub async fn connect(endpoint: &str, command_timeout: Duration) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        url::Url::parse(&http_endpoint)?;

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        debug!("Connected to browser: {}", version.browser);

        let browser_ws_url = version.web_socket_debugger_url;

        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (transport, recv_task) = Transport::start(ws_stream, command_timeout);
        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            browser_ws_url,
            product: version.browser,
            user_agent: version.user_agent,
            transport,
            recv_task,
        })
    }

    /// WebSocket receive loop.
    async fn receive_loop(mut ws_source: WsSource, pending: PendingMap) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => Self::dispatch(resp, &pending),
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        // Fail everything still waiting so callers do not sit out the timeout.
        for (_, req) in pending.lock().drain() {
            let _ = req.tx.send(Err(CdpError::SessionClosed));
        }
    }

    /// Route a response to the request waiting for it. Events are not
    /// subscribed to and are dropped.
    fn dispatch(resp: CdpResponse, pending: &PendingMap) {
        let Some(id) = resp.id else {
            if let Some(method) = resp.method {
                trace!("Ignoring CDP event {}", method);
            }
            return;
        };

        let Some(req) = pending.lock().remove(&id) else {
            return;
        };

        let result = match resp.error {
            Some(error) => Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            }),
            None => Ok(resp.result.unwrap_or(Value::Null)),
        };
        let _ = req.tx.send(result);
    }

    /// Send a browser-level CDP command and wait for response.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    /// Get browser WebSocket URL.
    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// Browser product string.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// User agent the browser reports by default.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    // ========================================================================
    // Target Management
    // ========================================================================

    /// List all pages.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", self.http_endpoint);
        let pages: Vec<PageInfo> = reqwest::get(&url).await?.json().await?;
        Ok(pages)
    }

    /// Create a new page/tab and attach a session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        // Chrome requires PUT method for /json/new
        let create_url = format!("{}/json/new?about:blank", self.http_endpoint);

        let client = reqwest::Client::new();
        let page_info: PageInfo = client.put(&create_url).send().await?.json().await?;
        debug!("Created new page: {} - {}", page_info.id, page_info.url);

        self.attach_page(&page_info.id).await
    }

    /// Attach to an existing page.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let session = PageSession::new(
            target_id.to_string(),
            session_id,
            self.transport.clone(),
        );

        session.enable_domains().await?;

        Ok(session)
    }

    /// Get all targets.
    pub async fn get_targets(&self) -> Result<Vec<TargetInfo>, CdpError> {
        let result = self.call("Target.getTargets", None).await?;
        let targets: Vec<TargetInfo> = serde_json::from_value(result["targetInfos"].clone())?;
        Ok(targets)
    }

    /// Close a page/target.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    /// Allow downloads and send them to `download_path` without prompting.
    pub async fn set_download_behavior(&self, download_path: &str) -> Result<(), CdpError> {
        self.call(
            "Browser.setDownloadBehavior",
            Some(json!({
                "behavior": "allow",
                "downloadPath": download_path,
            })),
        )
        .await?;
        debug!("Download behavior set to {}", download_path);
        Ok(())
    }

    /// Ask the browser to exit.
    pub async fn close_browser(&self) -> Result<(), CdpError> {
        match self.call("Browser.close", None).await {
            // The socket may drop before the response arrives.
            Ok(_) | Err(CdpError::SessionClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
