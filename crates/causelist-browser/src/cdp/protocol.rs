//! CDP wire types.
//!
//! Only the fields this crate reads are modelled; serde skips the rest.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Target session for page-level commands; absent for browser commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Incoming message: a command response when `id` is set, an event otherwise.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
}

/// Entry of `Target.getTargets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub target_id: String,
    #[serde(rename = "type")]
    pub target_type: String,
    pub url: String,
}

/// Entry of the `/json/list` and `/json/new` HTTP endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub url: String,
}

/// `/json/version`. Chrome mixes header-style and camelCase keys here.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "User-Agent")]
    pub user_agent: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Node returned by `DOM.getDocument` and `DOM.describeNode`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
    pub node_id: i64,
    pub node_name: String,
    /// Set on `<iframe>`/`<frame>` elements: the frame they host.
    pub frame_id: Option<String>,
}

impl DomNode {
    pub fn is_frame_owner(&self) -> bool {
        self.node_name.eq_ignore_ascii_case("iframe") || self.node_name.eq_ignore_ascii_case("frame")
    }
}

/// One frame of `Page.getFrameTree`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTree {
    pub frame: Frame,
    #[serde(default)]
    pub child_frames: Vec<FrameTree>,
}

impl FrameTree {
    /// Depth-first lookup by frame id.
    pub fn find(&self, frame_id: &str) -> Option<&Frame> {
        if self.frame.id == frame_id {
            Some(&self.frame)
        } else {
            self.child_frames.iter().find_map(|child| child.find(frame_id))
        }
    }

    /// Frames in the tree, the main frame included.
    pub fn frame_count(&self) -> usize {
        self.child_frames
            .iter()
            .fold(1, |count, child| count + child.frame_count())
    }
}

/// Image encoding for `Page.captureScreenshot`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
    Jpeg,
    Png,
    Webp,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
