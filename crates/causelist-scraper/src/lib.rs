//! # Causelist Scraper
//!
//! Downloads the daily cause lists of the Delhi District Courts.
//!
//! A run drives one Chrome instance through the court website: the search
//! form lives in an iframe, so every form interaction happens inside a
//! [`causelist_browser::FrameContext`]. Runs are serialized; the site and
//! the browser profile are not safe to share between concurrent runs.

mod complex;
mod download;
mod error;
mod fetcher;
mod probe;
mod request;
mod runner;
mod session;

pub use complex::CourtComplex;
pub use download::{DownloadWatcher, rename_downloads, target_file_name};
pub use error::ScraperError;
pub use fetcher::CauseListFetcher;
pub use probe::{ProbeReport, probe};
pub use request::{CauseListOutcome, CauseListRequest};
pub use runner::CauseListRunner;
pub use session::{ScrapeSession, manager_config, stealth_profile};
