// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Failure bookkeeping for the download stage.
//!
//! Failed originals are collected in input order and can be written back out
//! as a manifest of the same shape, so the whole tool can be rerun against
//! just the failures.

use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;

use crate::error::DownloadError;
use crate::manifest::Manifest;

/// Originals whose download failed: name -> URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureSet {
    entries: IndexMap<String, String>,
}

impl FailureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed download. The first URL recorded for a name wins.
    pub fn record(&mut self, error: &DownloadError) {
        self.entries
            .entry(error.name.clone())
            .or_insert_with(|| error.url.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Failed entries in the order they were attempted.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The failures as a manifest that can be fed back in.
    pub fn to_manifest(&self) -> Manifest {
        Manifest {
            emoji: self.entries.clone(),
        }
    }

    /// Write the retry manifest to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_manifest().save(path)?;
        tracing::info!("Recorded {} failed downloads in {:?}", self.len(), path);
        Ok(())
    }
}

/// Command line that reruns the tool against a retry manifest.
pub fn retry_command(program: &str, failures_path: &Path) -> String {
    let path = failures_path.display().to_string();
    if path.contains(char::is_whitespace) {
        format!("{} \"{}\"", program, path)
    } else {
        format!("{} {}", program, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DownloadCause;
    use tempfile::TempDir;

    fn failure(name: &str, url: &str) -> DownloadError {
        DownloadError {
            name: name.into(),
            url: url.into(),
            cause: DownloadCause::Status(reqwest::StatusCode::BAD_GATEWAY),
        }
    }

    #[test]
    fn test_record_keeps_order() {
        let mut failures = FailureSet::new();
        failures.record(&failure("zeta", "https://x/zeta.png"));
        failures.record(&failure("alpha", "https://x/alpha.gif"));
        failures.record(&failure("zeta", "https://x/other.png"));

        assert_eq!(failures.len(), 2);
        let entries: Vec<_> = failures.iter().collect();
        assert_eq!(
            entries,
            vec![("zeta", "https://x/zeta.png"), ("alpha", "https://x/alpha.gif")]
        );
    }

    #[test]
    fn test_save_produces_rerunnable_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("failures.json");

        let mut failures = FailureSet::new();
        failures.record(&failure("blob", "https://x/blob.png"));
        failures.save(&path).unwrap();

        let reloaded = Manifest::load(&path).unwrap();
        let partition = reloaded.partition();
        assert_eq!(partition.originals["blob"], "https://x/blob.png");
        assert!(partition.aliases.is_empty());
    }

    #[test]
    fn test_retry_command() {
        assert_eq!(
            retry_command("emoji-dump", Path::new("/work/failures.json")),
            "emoji-dump /work/failures.json"
        );
        assert_eq!(
            retry_command("emoji-dump", Path::new("/my work/failures.json")),
            "emoji-dump \"/my work/failures.json\""
        );
    }
}
