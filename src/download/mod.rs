// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Download stage for emoji-dump.
//!
//! Fetches every original in manifest order, one at a time:
//! - A failed entry is recorded and the batch moves on
//! - A fixed pause every N fetches keeps the CDN from rate limiting us
//! - Failures can be saved as a manifest and fed back in to retry
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │ DownloadManager │────▶│ Downloader      │
//! │ (batch loop)    │     │ (blocking GET)  │
//! └────────┬────────┘     └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ FailureSet      │──▶ failures.json
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use emoji_dump::config::FetchConfig;
//! use emoji_dump::download::DownloadManager;
//! use emoji_dump::manifest::Manifest;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let manifest = Manifest::load(Path::new("emoji.json"))?;
//! let partition = manifest.partition();
//!
//! let manager = DownloadManager::new(&FetchConfig::default(), Path::new("output"))?;
//! let failures = manager.download_all(&partition.originals);
//! if !failures.is_empty() {
//!     failures.save(Path::new("failures.json"))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod manager;
pub mod state;

pub use client::Downloader;
pub use manager::DownloadManager;
pub use state::{retry_command, FailureSet};
