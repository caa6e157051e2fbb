//! DOM operations for CDP page session.

use serde_json::json;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{DomNode, FrameTree};

use super::core::PageSession;

impl PageSession {
    /// Get document root node.
    pub async fn get_document(&self) -> Result<DomNode, CdpError> {
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;

        let root: DomNode = serde_json::from_value(result["root"].clone())?;
        Ok(root)
    }

    /// Query selector.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.get_document().await?;

        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({
                    "nodeId": doc.node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_id = result["nodeId"].as_i64().unwrap_or(0);
        if node_id == 0 {
            Ok(None)
        } else {
            Ok(Some(node_id))
        }
    }

    /// Describe a node, including the frame it hosts if it is an iframe.
    pub async fn describe_node(&self, node_id: i64) -> Result<DomNode, CdpError> {
        let result = self
            .call(
                "DOM.describeNode",
                Some(json!({"nodeId": node_id, "depth": 0})),
            )
            .await?;

        let node: DomNode = serde_json::from_value(result["node"].clone())?;
        Ok(node)
    }

    /// Get the page's frame tree.
    pub async fn frame_tree(&self) -> Result<FrameTree, CdpError> {
        let result = self.call("Page.getFrameTree", None).await?;
        let tree: FrameTree = serde_json::from_value(result["frameTree"].clone())?;
        Ok(tree)
    }
}
