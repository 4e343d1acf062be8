// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sequential batch download with failure tracking and throttling.

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Result;
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};

use super::client::Downloader;
use super::state::FailureSet;
use crate::config::FetchConfig;
use crate::utils::fit_to_width;

/// Width the current name is fitted to on the progress line.
const NAME_COLUMN_WIDTH: usize = 30;

/// Drives the fetch stage over every original.
#[derive(Debug)]
pub struct DownloadManager {
    downloader: Downloader,
    output_dir: PathBuf,
    config: FetchConfig,
    progress: bool,
}

impl DownloadManager {
    /// Create a manager that writes into `output_dir`.
    ///
    /// The directory must already exist.
    pub fn new(config: &FetchConfig, output_dir: &Path) -> Result<Self> {
        Ok(Self {
            downloader: Downloader::new(config)?,
            output_dir: output_dir.to_path_buf(),
            config: config.clone(),
            progress: false,
        })
    }

    /// Draw a progress bar on stderr while downloading.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Download every original in order.
    ///
    /// A failed entry never stops the batch. Returns the entries that
    /// could not be downloaded.
    pub fn download_all(&self, originals: &IndexMap<String, String>) -> FailureSet {
        let total = originals.len();
        let bar = self.progress_bar(total as u64);
        let mut failures = FailureSet::new();

        for (index, (name, url)) in originals.iter().enumerate() {
            bar.set_message(fit_to_width(name, NAME_COLUMN_WIDTH));

            if let Err(e) = self.downloader.fetch(name, url, &self.output_dir) {
                // Log lines share stderr with the bar.
                bar.suspend(|| tracing::warn!("Download failed: {}", e));
                failures.record(&e);
            }
            bar.inc(1);

            let done = index + 1;
            if self.should_pause(done, total) {
                tracing::debug!(
                    "Fetched {} of {}, pausing {:?}",
                    done,
                    total,
                    self.config.throttle_pause
                );
                thread::sleep(self.config.throttle_pause);
            }
        }

        bar.finish();
        tracing::info!(
            "Downloaded {} of {} originals ({} failed)",
            total - failures.len(),
            total,
            failures.len()
        );
        failures
    }

    /// Pause after every full batch, but not after the final fetch.
    fn should_pause(&self, done: usize, total: usize) -> bool {
        let every = self.config.throttle_every;
        every > 0 && done < total && done % every == 0 && !self.config.throttle_pause.is_zero()
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template("{human_pos:>6} / {human_len}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::time::Duration;
    use tempfile::TempDir;

    fn manager(dir: &Path, fetch: FetchConfig) -> DownloadManager {
        DownloadManager::new(&fetch, dir).unwrap()
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let mut server = Server::new();
        let _a = server.mock("GET", "/a.png").with_status(200).with_body("a").create();
        let _b = server.mock("GET", "/b.png").with_status(500).create();
        let _c = server.mock("GET", "/c.gif").with_status(200).with_body("c").create();

        let mut originals = IndexMap::new();
        originals.insert("a".to_string(), format!("{}/a.png", server.url()));
        originals.insert("b".to_string(), format!("{}/b.png", server.url()));
        originals.insert("c".to_string(), format!("{}/c.gif", server.url()));

        let dir = TempDir::new().unwrap();
        let failures = manager(dir.path(), FetchConfig::unthrottled()).download_all(&originals);

        assert_eq!(failures.len(), 1);
        assert!(failures.contains("b"));
        assert!(dir.path().join("a.png").is_file());
        assert!(dir.path().join("c.gif").is_file());
        assert!(!dir.path().join("b.png").exists());
    }

    #[test]
    fn test_failures_recorded_with_progress_bar() {
        let dir = TempDir::new().unwrap();
        let mut originals = IndexMap::new();
        originals.insert("offline".to_string(), "http://127.0.0.1:1/offline.png".to_string());
        originals.insert("../escaped".to_string(), "http://127.0.0.1:1/escaped.png".to_string());

        let failures = manager(dir.path(), FetchConfig::unthrottled())
            .with_progress(true)
            .download_all(&originals);

        assert_eq!(failures.len(), 2);
        assert!(failures.contains("offline"));
        assert!(failures.contains("../escaped"));
    }

    #[test]
    fn test_empty_batch() {
        let dir = TempDir::new().unwrap();
        let failures = manager(dir.path(), FetchConfig::unthrottled()).download_all(&IndexMap::new());
        assert!(failures.is_empty());
    }

    #[test]
    fn test_should_pause() {
        let dir = TempDir::new().unwrap();
        let fetch = FetchConfig {
            throttle_every: 2,
            throttle_pause: Duration::from_millis(1),
            ..FetchConfig::unthrottled()
        };
        let m = manager(dir.path(), fetch);

        assert!(!m.should_pause(1, 5));
        assert!(m.should_pause(2, 5));
        assert!(!m.should_pause(3, 5));
        assert!(m.should_pause(4, 5));
        // Never after the last item.
        assert!(!m.should_pause(4, 4));

        let off = manager(dir.path(), FetchConfig::unthrottled());
        assert!(!off.should_pause(100, 200));
    }
}
