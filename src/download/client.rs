// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Blocking HTTP fetch of a single emoji image.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::FetchConfig;
use crate::error::{DownloadCause, DownloadError};
use crate::manifest::{file_name, is_contained};

/// Client for fetching emoji images.
#[derive(Debug, Clone)]
pub struct Downloader {
    /// HTTP client with configured timeouts.
    client: reqwest::blocking::Client,
}

impl Downloader {
    /// Create a downloader with the given timeouts.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Download `url` into `<output_dir>/<name>.<ext>`.
    ///
    /// The body is written verbatim. Nothing is left on disk when the
    /// request or the write fails.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] for a name that would land outside
    /// `output_dir`, a non-success status, any transport failure, or a
    /// failed write. Unsafe names are refused before any request is made.
    pub fn fetch(&self, name: &str, url: &str, output_dir: &Path) -> Result<PathBuf, DownloadError> {
        let fail = |cause: DownloadCause| DownloadError {
            name: name.to_string(),
            url: url.to_string(),
            cause,
        };

        let file = file_name(name, url);
        if !is_contained(&file) {
            return Err(fail(DownloadCause::UnsafeName(file)));
        }

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fail(DownloadCause::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(DownloadCause::Status(status)));
        }

        let body = response
            .bytes()
            .map_err(|e| fail(DownloadCause::Transport(e)))?;

        let path = output_dir.join(file);
        if let Err(source) = fs::write(&path, &body) {
            let _ = fs::remove_file(&path);
            return Err(fail(DownloadCause::Write { path, source }));
        }

        tracing::debug!("Saved {} ({} bytes) to {:?}", name, body.len(), path);
        Ok(path)
    }
}
