//! # Causelist Web
//!
//! The browser-facing side of the downloader: a one-page form for picking
//! a court complex and a date, and the JSON endpoint the form posts to.
//!
//! ## Usage
//!
//! ```ignore
//! use causelist_web::{WebConfig, WebServer};
//!
//! let server = WebServer::new(WebConfig::new("127.0.0.1", 5000), fetcher);
//! server.run().await?;
//! ```

mod error;
mod routes;
mod server;
mod state;

pub use error::{WebError, error_chain};
pub use routes::{DownloadForm, DownloadResponse, create_router};
pub use server::{WebConfig, WebServer};
pub use state::AppState;
