// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Relative symlink creation inside the output directory.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::LinkError;
use crate::manifest::is_contained;

/// Create `<output_dir>/<link_name>` pointing at `<output_dir>/<target_name>`.
///
/// The link stores the bare `target_name`, so the output directory can be
/// moved or renamed without breaking it. Nothing is created unless the
/// target is an existing regular file.
///
/// # Errors
///
/// [`LinkError::UnsafeName`] if either name would escape `output_dir`,
/// [`LinkError::MissingTarget`] if the target file is absent, or
/// [`LinkError::Io`] if the OS refuses the link.
pub fn link(output_dir: &Path, link_name: &str, target_name: &str) -> Result<PathBuf, LinkError> {
    for name in [link_name, target_name] {
        if !is_contained(name) {
            return Err(LinkError::UnsafeName(name.to_string()));
        }
    }

    let target = output_dir.join(target_name);
    if !target.is_file() {
        return Err(LinkError::MissingTarget { target });
    }

    let link_path = output_dir.join(link_name);
    symlink_file(Path::new(target_name), &link_path).map_err(|source| LinkError::Io {
        link: link_path.clone(),
        source,
    })?;

    Ok(link_path)
}

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
