// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Emoji manifest loading, partitioning, and saving.
//!
//! A manifest is the `emoji` object of a Slack `emoji.list` response:
//!
//! ```json
//! {
//!     "emoji": {
//!         "party_parrot": "https://emoji.slack-edge.com/T0/party_parrot/1a2b.gif",
//!         "parrot": "alias:party_parrot"
//!     }
//! }
//! ```
//!
//! Other top-level keys (`ok`, `cache_ts`, ...) are ignored, so a raw API
//! response can be fed in as-is.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// Marker that turns a target into a reference to another name.
pub const ALIAS_PREFIX: &str = "alias:";

/// Ordered mapping of emoji name to target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub emoji: IndexMap<String, String>,
}

/// What a manifest target points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// A direct image URL.
    Url(&'a str),
    /// Another manifest name.
    Alias(&'a str),
}

impl<'a> Target<'a> {
    /// Classify a raw target string.
    ///
    /// Alias references keep only the first `:`-delimited segment after the
    /// marker, so `alias:a:b` refers to `a`.
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix(ALIAS_PREFIX) {
            Some(rest) => Target::Alias(rest.split(':').next().unwrap_or(rest)),
            None => Target::Url(raw),
        }
    }
}

/// A manifest split into downloadable originals and aliases.
///
/// Every manifest name lands in exactly one of the two maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// name -> URL
    pub originals: IndexMap<String, String>,
    /// name -> referenced name
    pub aliases: IndexMap<String, String>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ManifestError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        self.emoji.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emoji.is_empty()
    }

    /// Split entries into originals and aliases, preserving input order.
    pub fn partition(&self) -> Partition {
        let mut partition = Partition::default();

        for (name, raw) in &self.emoji {
            match Target::parse(raw) {
                Target::Url(url) => {
                    partition.originals.insert(name.clone(), url.to_string());
                }
                Target::Alias(referenced) => {
                    partition.aliases.insert(name.clone(), referenced.to_string());
                }
            }
        }

        partition
    }

    /// Write the manifest as 4-space indented JSON.
    ///
    /// Writes to a sibling temp file first and renames it into place, so an
    /// interrupted run never leaves a truncated manifest behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let temp_path = path.with_extension("json.tmp");
        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;
            let mut writer = BufWriter::new(file);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            self.serialize(&mut serializer)
                .with_context(|| "Failed to serialize manifest")?;
            writer.write_all(b"\n")?;
            writer
                .into_inner()
                .map_err(|e| e.into_error())
                .and_then(|file| file.sync_all())
                .with_context(|| format!("Failed to flush {:?}", temp_path))?;
        }

        fs::rename(&temp_path, path).with_context(|| {
            let _ = fs::remove_file(&temp_path);
            format!("Failed to move manifest into place: {:?}", path)
        })?;

        Ok(())
    }
}

impl Partition {
    /// URL of an original, if `name` is one.
    pub fn url_of(&self, name: &str) -> Option<&str> {
        self.originals.get(name).map(String::as_str)
    }
}

/// Extension of the file a URL points at: everything after the final `.`.
///
/// Returns `None` when the last path segment has no dot, so
/// `https://host/emoji/blob` yields a bare file name instead of a path
/// fragment.
pub fn url_extension(url: &str) -> Option<&str> {
    let (_, ext) = url.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') {
        None
    } else {
        Some(ext)
    }
}

/// File name an original is stored under: `<name>.<ext>`.
///
/// Aliases reuse their original's extension, so links and files line up.
pub fn file_name(name: &str, url: &str) -> String {
    match url_extension(url) {
        Some(ext) => format!("{}.{}", name, ext),
        None => name.to_string(),
    }
}

/// Whether `file_name` stays inside the directory it is joined onto.
///
/// `Path::join` discards the base for absolute paths, and `..` walks out of
/// it, so names with a root, a drive prefix, or a parent component are
/// refused.
pub fn is_contained(file_name: &str) -> bool {
    Path::new(file_name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
