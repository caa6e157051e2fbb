//! Fetcher abstraction the web layer depends on.

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::request::{CauseListOutcome, CauseListRequest};

/// Something that can fetch the cause lists for a request.
#[async_trait]
pub trait CauseListFetcher: Send + Sync {
    /// Fetch and store the cause lists for `request`.
    async fn fetch(&self, request: &CauseListRequest) -> Result<CauseListOutcome, ScraperError>;
}
