//! Chrome automation for the cause list downloader.
//!
//! Drives a locally launched Chrome through the Chrome DevTools Protocol
//! (CDP). Pure Rust, no WebDriver binary required.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  Rust Backend   │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)   │       CDP        │ (launched by us) │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Frames
//!
//! Cause list pages embed the actual search form in an iframe. A
//! [`FrameContext`] is obtained with [`PageSession::wait_for_frame`] and
//! evaluates scripts inside the frame's document, which is the CDP
//! equivalent of switching the browsing context into the frame.
//!
//! Chrome is launched with site isolation disabled so that cross-origin
//! iframes stay in the page's renderer and remain reachable from the page
//! session.

pub mod cdp;
pub mod manager;
pub mod stealth;

pub use cdp::{CdpClient, CdpError, FrameContext, PageSession};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use stealth::StealthProfile;
