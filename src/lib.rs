// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! emoji-dump - bulk-download a custom emoji pack
//!
//! Reads an emoji manifest (a Slack `emoji.list` export), downloads every
//! image it names, and recreates aliases as relative symlinks next to the
//! originals:
//!
//! **Manifest** -> **Download** -> **Link aliases** -> **Retry manifest**
//!
//! # Core Modules
//!
//! - [`manifest`] - Manifest loading and the original/alias split
//! - [`download`] - Sequential fetch with failure tracking and throttling
//! - [`alias`] - Cycle-safe alias resolution and symlink creation
//! - [`pipeline`] - The whole run, end to end
//! - [`config`] - Output locations and fetch tunables
//! - [`error`] - Error types and error formatting utilities

pub mod alias;
pub mod config;
pub mod download;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod utils;

pub use alias::{link, link_aliases, resolve, LinkSummary, SkipReason, SkippedAlias};
pub use config::{Config, FetchConfig};
pub use download::{retry_command, DownloadManager, Downloader, FailureSet};
pub use error::{
    DownloadCause, DownloadError, ErrorBuilder, LinkError, ManifestError, OutputError,
    ResolveError,
};
pub use manifest::{Manifest, Partition, Target};
pub use pipeline::{prepare_output, run, RunSummary};
