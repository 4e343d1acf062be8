// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end run: prepare output, download originals, link aliases, and
//! record failures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use crate::alias::{link_aliases, SkippedAlias};
use crate::config::Config;
use crate::download::{DownloadManager, FailureSet};
use crate::error::OutputError;
use crate::manifest::Manifest;

/// What a run achieved.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Originals written to disk.
    pub downloaded: usize,
    pub failures: FailureSet,
    /// Aliases turned into symlinks.
    pub linked: usize,
    pub skipped: Vec<SkippedAlias>,
    /// Set when failures were recorded and the retry manifest was saved.
    pub failures_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}

/// Wipe and recreate the output directory.
///
/// Refuses a directory that is, or contains, the current working directory.
pub fn prepare_output(dir: &Path) -> Result<(), OutputError> {
    let wrap = |source: io::Error| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let cwd = std::env::current_dir().map_err(wrap)?;
    guard_working_dir(dir, &cwd)?;

    match fs::remove_dir_all(dir) {
        Ok(()) => tracing::debug!("Removed previous output at {:?}", dir),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(wrap(e)),
    }
    fs::create_dir_all(dir).map_err(wrap)
}

/// Fail if wiping `dir` would remove `cwd`.
fn guard_working_dir(dir: &Path, cwd: &Path) -> Result<(), OutputError> {
    // A directory that doesn't exist yet can't contain anything.
    let Ok(dir) = dir.canonicalize() else {
        return Ok(());
    };
    let cwd = cwd.canonicalize().unwrap_or_else(|_| cwd.to_path_buf());

    if cwd.starts_with(&dir) {
        return Err(OutputError::ContainsWorkingDir { path: dir, cwd });
    }
    Ok(())
}

/// Run every stage against `manifest`.
///
/// Only a failure to prepare the output directory (or to build the HTTP
/// client) stops the run. Individual download, resolution, and link
/// problems end up in the returned summary.
pub fn run(manifest: &Manifest, config: &Config) -> Result<RunSummary> {
    let partition = manifest.partition();
    tracing::info!(
        "Manifest has {} originals and {} aliases",
        partition.originals.len(),
        partition.aliases.len()
    );

    prepare_output(&config.output_dir)?;

    if config.progress {
        println!("{}", "Downloading images".bold());
    }
    let manager =
        DownloadManager::new(&config.fetch, &config.output_dir)?.with_progress(config.progress);
    let failures = manager.download_all(&partition.originals);

    if config.progress {
        println!();
        println!("{}", "Creating symlinks for aliases".bold());
        println!("Some of these may fail if they refer to one of Slack's default emoji");
    }
    let links = link_aliases(&partition, &config.output_dir);

    let failures_path = if failures.is_empty() {
        None
    } else {
        match failures.save(&config.failures_path) {
            Ok(()) => Some(config.failures_path.clone()),
            Err(e) => {
                tracing::error!("Failed to write retry manifest: {:#}", e);
                None
            }
        }
    };

    Ok(RunSummary {
        downloaded: partition.originals.len() - failures.len(),
        failures,
        linked: links.linked,
        skipped: links.skipped,
        failures_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_output_wipes_previous_run() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("stale.png"), b"old").unwrap();

        prepare_output(&out).unwrap();

        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_output_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a").join("b");
        prepare_output(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_prepare_output_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let err = prepare_output(&blocker.join("output")).unwrap_err();
        assert_eq!(err.path(), blocker.join("output"));
    }

    #[test]
    fn test_guard_refuses_working_dir_and_its_parents() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().join("project");
        fs::create_dir(&cwd).unwrap();
        fs::write(cwd.join("emoji.json"), b"{}").unwrap();

        for candidate in [cwd.clone(), cwd.join("."), dir.path().to_path_buf()] {
            let err = guard_working_dir(&candidate, &cwd).unwrap_err();
            assert!(matches!(err, OutputError::ContainsWorkingDir { .. }));
        }
        assert!(cwd.join("emoji.json").is_file());
    }

    #[test]
    fn test_guard_allows_subdirectory_and_missing_dir() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path();
        fs::create_dir(cwd.join("output")).unwrap();

        assert!(guard_working_dir(&cwd.join("output"), cwd).is_ok());
        assert!(guard_working_dir(&cwd.join("not-yet"), cwd).is_ok());
    }

    #[test]
    fn test_aliases_only_manifest() {
        let dir = TempDir::new().unwrap();
        let config = Config::in_dir(dir.path()).with_progress(false);
        let manifest = Manifest::from_json(r#"{"emoji": {"a": "alias:b"}}"#).unwrap();

        let summary = run(&manifest, &config).unwrap();

        assert_eq!(summary.downloaded, 0);
        assert_eq!(summary.linked, 0);
        assert_eq!(summary.skipped.len(), 1);
        assert!(summary.failures_path.is_none());
        assert!(!config.failures_path.exists());
        assert!(!summary.is_complete());
    }
}
