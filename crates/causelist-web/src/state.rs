//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use causelist_scraper::CauseListFetcher;

/// State shared across handlers.
pub struct AppState {
    pub fetcher: Arc<dyn CauseListFetcher>,
    start_time: Instant,
    runs_succeeded: AtomicU64,
    runs_failed: AtomicU64,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn CauseListFetcher>) -> Self {
        Self {
            fetcher,
            start_time: Instant::now(),
            runs_succeeded: AtomicU64::new(0),
            runs_failed: AtomicU64::new(0),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn record_run(&self, succeeded: bool) {
        let counter = if succeeded {
            &self.runs_succeeded
        } else {
            &self.runs_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn runs_succeeded(&self) -> u64 {
        self.runs_succeeded.load(Ordering::Relaxed)
    }

    pub fn runs_failed(&self) -> u64 {
        self.runs_failed.load(Ordering::Relaxed)
    }
}
