// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Run configuration.
//!
//! Nothing in the library reads process-wide state: every path and tunable
//! is carried in a [`Config`] handed to the pipeline.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default output directory name, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default retry manifest name, relative to the working directory.
pub const DEFAULT_FAILURES_FILE: &str = "failures.json";

/// Timeout for establishing a connection (in seconds).
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Timeout for a whole request including the body (in seconds).
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pause after this many consecutive fetches.
const THROTTLE_EVERY: usize = 100;

/// Length of the throttle pause (in seconds).
const THROTTLE_PAUSE_SECS: u64 = 3;

/// Settings for the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Sleep after every `throttle_every` fetches. Zero disables throttling.
    pub throttle_every: usize,
    pub throttle_pause: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            throttle_every: THROTTLE_EVERY,
            throttle_pause: Duration::from_secs(THROTTLE_PAUSE_SECS),
        }
    }
}

impl FetchConfig {
    /// No throttling and short timeouts, for tests against a local server.
    pub fn unthrottled() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            throttle_every: 0,
            throttle_pause: Duration::ZERO,
        }
    }
}

/// Everything a run needs to know about where to put things.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Wiped and recreated at the start of every run.
    pub output_dir: PathBuf,
    /// Where the retry manifest goes when downloads fail.
    pub failures_path: PathBuf,
    /// Draw the progress bar (on stderr) and stage headers (on stdout).
    pub progress: bool,
    pub fetch: FetchConfig,
}

impl Config {
    /// Default layout rooted at `base`: `<base>/output` and
    /// `<base>/failures.json`.
    pub fn in_dir(base: &Path) -> Self {
        Self {
            output_dir: base.join(DEFAULT_OUTPUT_DIR),
            failures_path: base.join(DEFAULT_FAILURES_FILE),
            progress: true,
            fetch: FetchConfig::default(),
        }
    }

    /// Default layout rooted at the current working directory.
    pub fn from_current_dir() -> io::Result<Self> {
        Ok(Self::in_dir(&std::env::current_dir()?))
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_failures_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.failures_path = path.into();
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }
}
