// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Alias stage: rebuild the alias graph as symlinks.
//!
//! Every alias is resolved to the original at the end of its chain and
//! linked to that original's file under the same extension. Aliases that
//! don't resolve, or whose original never made it to disk, are skipped and
//! reported rather than left as dangling links.
//!
//! Must run after the download stage has finished, since linking checks
//! that the target file exists.

pub mod link;
pub mod resolve;

use std::fmt;
use std::path::Path;

use crate::error::{LinkError, ResolveError};
use crate::manifest::{file_name, Partition};

pub use link::link;
pub use resolve::resolve;

/// Why an alias got no link.
#[derive(Debug)]
pub enum SkipReason {
    Unresolved(ResolveError),
    Link(LinkError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved(e) => write!(f, "{}", e),
            Self::Link(e) => write!(f, "{}", e),
        }
    }
}

/// An alias that was not linked, with the reason.
#[derive(Debug)]
pub struct SkippedAlias {
    pub alias: String,
    pub reason: SkipReason,
}

/// Result of the alias stage.
#[derive(Debug, Default)]
pub struct LinkSummary {
    pub linked: usize,
    pub skipped: Vec<SkippedAlias>,
}

/// Create a symlink for every alias in `partition`, in manifest order.
pub fn link_aliases(partition: &Partition, output_dir: &Path) -> LinkSummary {
    let mut summary = LinkSummary::default();

    for alias in partition.aliases.keys() {
        match link_alias(partition, output_dir, alias) {
            Ok(()) => summary.linked += 1,
            Err(reason) => {
                tracing::warn!("Skipping alias {}: {}", alias, reason);
                summary.skipped.push(SkippedAlias {
                    alias: alias.clone(),
                    reason,
                });
            }
        }
    }

    summary
}

fn link_alias(partition: &Partition, output_dir: &Path, alias: &str) -> Result<(), SkipReason> {
    let original = resolve(alias, &partition.originals, &partition.aliases)
        .map_err(SkipReason::Unresolved)?;
    // resolve only returns names present in originals
    let url = partition.url_of(original).unwrap_or_default();

    let target = file_name(original, url);
    let link_name = file_name(alias, url);
    let path = link(output_dir, &link_name, &target).map_err(SkipReason::Link)?;

    tracing::debug!("Linked {:?} -> {}", path, target);
    Ok(())
}
