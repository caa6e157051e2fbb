//! Download tracking and renaming.
//!
//! Chrome writes a download to `<name>.crdownload` and renames it when the
//! transfer finishes. A file counts as complete once it is no longer
//! partial and its size is unchanged between two polls.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::complex::CourtComplex;
use crate::error::ScraperError;

const DEFAULT_POLL: Duration = Duration::from_millis(500);

/// Watches a directory for downloads that appear after it was created.
#[derive(Debug)]
pub struct DownloadWatcher {
    dir: PathBuf,
    baseline: BTreeSet<PathBuf>,
    poll_interval: Duration,
}

impl DownloadWatcher {
    /// Snapshot `dir`; files already present are never reported.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ScraperError> {
        let dir = dir.into();
        let baseline = list_files(&dir)?;
        debug!("Download baseline: {} file(s) in {}", baseline.len(), dir.display());
        Ok(Self {
            dir,
            baseline,
            poll_interval: DEFAULT_POLL,
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Directory being watched.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Wait until `expected` new files have completed, returning them in
    /// the order they completed.
    pub async fn wait_for(
        &self,
        expected: usize,
        timeout: Duration,
    ) -> Result<Vec<PathBuf>, ScraperError> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut sizes: BTreeMap<PathBuf, u64> = BTreeMap::new();
        let mut completed: Vec<PathBuf> = Vec::new();

        loop {
            for path in list_files(&self.dir)? {
                if self.baseline.contains(&path)
                    || is_partial_download(&path)
                    || completed.contains(&path)
                {
                    continue;
                }

                let size = match std::fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => meta.len(),
                    _ => continue,
                };

                match sizes.get(&path) {
                    Some(previous) if *previous == size => {
                        info!("Download complete: {} ({} bytes)", path.display(), size);
                        completed.push(path);
                    }
                    _ => {
                        sizes.insert(path, size);
                    }
                }
            }

            if completed.len() >= expected {
                return Ok(completed);
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(ScraperError::DownloadTimeout {
                    expected,
                    completed: completed.len(),
                    timeout,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn list_files(dir: &Path) -> Result<BTreeSet<PathBuf>, ScraperError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ScraperError::DownloadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = BTreeSet::new();
    for entry in entries {
        paths.insert(entry?.path());
    }
    Ok(paths)
}

/// Whether `path` is an in-progress browser download.
pub(crate) fn is_partial_download(path: &Path) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("crdownload") || ext.eq_ignore_ascii_case("tmp"))
        .unwrap_or(false)
}

/// `<Complex_Name>_<YYYY-MM-DD>_<n>.pdf`
pub fn target_file_name(complex: CourtComplex, date: NaiveDate, n: usize) -> String {
    format!("{}_{}_{}.pdf", complex.file_stem(), date.format("%Y-%m-%d"), n)
}

/// Rename downloaded files to their cause list names, numbering from 1 and
/// skipping numbers whose file already exists.
pub fn rename_downloads(
    files: &[PathBuf],
    complex: CourtComplex,
    date: NaiveDate,
) -> Result<Vec<PathBuf>, ScraperError> {
    let mut renamed = Vec::with_capacity(files.len());
    let mut n = 1;

    for file in files {
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        let target = loop {
            let candidate = dir.join(target_file_name(complex, date, n));
            n += 1;
            if !candidate.exists() {
                break candidate;
            }
        };

        std::fs::rename(file, &target)?;
        debug!("Renamed {} -> {}", file.display(), target.display());
        renamed.push(target);
    }

    Ok(renamed)
}

#[cfg(test)]
#[path = "download_tests.rs"]
mod tests;
