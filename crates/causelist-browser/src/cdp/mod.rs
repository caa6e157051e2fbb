//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome via WebSocket and communicates using the CDP
//! JSON-RPC protocol.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let page = client.new_page().await?;
//! page.navigate("https://example.com").await?;
//! let frame = page.wait_for_frame("iframe", Duration::from_secs(30)).await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::{FrameContext, PageSession};
