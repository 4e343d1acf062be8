// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types and error formatting for emoji-dump.
//!
//! Only [`ManifestError`] and [`OutputError`] stop a run. Everything else is
//! recorded against the entry it concerns and the run carries on.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The manifest could not be loaded. Fatal: nothing is downloaded.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("could not read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The manifest is not `{"emoji": {name: target}}` with string targets.
    #[error("manifest {} is not a valid emoji manifest: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The output directory could not be recreated. Fatal.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not prepare output directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Wiping the directory would take the working directory with it.
    #[error("refusing to wipe {}: it contains the working directory {}", path.display(), cwd.display())]
    ContainsWorkingDir { path: PathBuf, cwd: PathBuf },
}

impl OutputError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::ContainsWorkingDir { path, .. } => path,
        }
    }
}

/// A single original failed to download. Recorded, never fatal.
#[derive(Debug, Error)]
#[error("{name}: {cause}")]
pub struct DownloadError {
    pub name: String,
    pub url: String,
    #[source]
    pub cause: DownloadCause,
}

/// Why a download failed.
#[derive(Debug, Error)]
pub enum DownloadCause {
    /// The server answered with a non-success status.
    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),
    /// Connect, DNS, timeout, or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The name would place the file outside the output directory.
    #[error("name {0:?} would be written outside the output directory")]
    UnsafeName(String),
    /// The body arrived but could not be written to disk.
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An alias chain that does not end at an original.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The chain reached a name that is neither an original nor an alias.
    #[error("alias target not found: {missing} (from {name})")]
    NotFound { name: String, missing: String },
    /// The chain revisits a name.
    #[error("alias cycle: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },
}

/// A symlink that was not created.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The file the link would point at does not exist, usually because its
    /// download failed.
    #[error("link target {} does not exist", target.display())]
    MissingTarget { target: PathBuf },
    /// The link or its target would sit outside the output directory.
    #[error("name {0:?} would be linked outside the output directory")]
    UnsafeName(String),
    #[error("could not create link {}: {source}", link.display())]
    Io {
        link: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Formats an error message with title, causes, and fixes.
///
/// Used by the binary for fatal errors, where the operator needs something
/// actionable rather than a bare error chain.
pub fn format_error(title: &str, causes: &[&str], fixes: &[&str]) -> String {
    let mut output = format!("[✗] {}\n", title);

    if !causes.is_empty() {
        output.push_str("\nPossible causes:\n");
        for cause in causes {
            output.push_str(&format!("  - {}\n", cause));
        }
    }

    if !fixes.is_empty() {
        output.push_str("\nTry these fixes:\n");
        for (i, fix) in fixes.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, fix));
        }
    }

    output
}

/// Builder for constructing formatted error messages.
///
/// ```
/// use emoji_dump::error::ErrorBuilder;
///
/// let message = ErrorBuilder::new("Could not read manifest")
///     .cause("The path does not exist")
///     .fix("Export the emoji list again")
///     .build();
/// assert!(message.contains("Possible causes:"));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorBuilder {
    title: String,
    causes: Vec<String>,
    fixes: Vec<String>,
}

impl ErrorBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            causes: Vec::new(),
            fixes: Vec::new(),
        }
    }

    /// Add a possible cause.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a suggested fix.
    pub fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fixes.push(fix.into());
        self
    }

    pub fn build(&self) -> String {
        let causes: Vec<&str> = self.causes.iter().map(String::as_str).collect();
        let fixes: Vec<&str> = self.fixes.iter().map(String::as_str).collect();
        format_error(&self.title, &causes, &fixes)
    }
}

impl fmt::Display for ErrorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        let error = format_error("Test Error", &["Cause 1", "Cause 2"], &["Fix 1", "Fix 2"]);

        assert!(error.starts_with("[✗] Test Error\n"));
        assert!(error.contains("  - Cause 1"));
        assert!(error.contains("  - Cause 2"));
        assert!(error.contains("  1. Fix 1"));
        assert!(error.contains("  2. Fix 2"));
    }

    #[test]
    fn test_empty_causes_and_fixes() {
        let error = format_error("Empty test", &[], &[]);
        assert_eq!(error, "[✗] Empty test\n");
    }

    #[test]
    fn test_error_builder_display() {
        let builder = ErrorBuilder::new("Display test").cause("Cause").fix("Fix");
        let error = format!("{}", builder);
        assert!(error.contains("[✗] Display test"));
        assert!(error.contains("  - Cause"));
        assert!(error.contains("  1. Fix"));
    }

    #[test]
    fn test_cycle_message_shows_chain() {
        let err = ResolveError::Cycle {
            chain: vec!["x".into(), "y".into(), "x".into()],
        };
        assert_eq!(err.to_string(), "alias cycle: x -> y -> x");
    }

    #[test]
    fn test_download_error_names_entry() {
        let err = DownloadError {
            name: "party_parrot".into(),
            url: "https://emoji.example/party_parrot.gif".into(),
            cause: DownloadCause::Status(reqwest::StatusCode::NOT_FOUND),
        };
        assert_eq!(err.to_string(), "party_parrot: server responded with 404 Not Found");
    }
}
