//! Existing-file scan: which manifest files are already on disk.
//!
//! Detection uses the fixed NCBI layout that downstream Kraken 2 build steps
//! expect, so only files matching [`GENOME_GLOB`] count as present.

use anyhow::{Context, Result};
use std::collections::HashSet;

use crate::layout::Layout;

/// Layout of downloaded RefSeq assemblies, relative to the base directory.
pub const GENOME_GLOB: &str = "genomes/all/GCF/*/*/*/GCF*/*gz";

/// Relative paths found on disk when the run started. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentFileSet {
    paths: HashSet<String>,
}

impl PresentFileSet {
    pub fn contains(&self, rel: &str) -> bool {
        self.paths.contains(rel)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PresentFileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Glob pattern for `rel` (which may itself contain wildcards) under the escaped base.
pub(crate) fn pattern_under_base(layout: &Layout, rel: &str) -> String {
    let base = glob::Pattern::escape(&layout.base().to_string_lossy());
    if base.ends_with('/') {
        format!("{}{}", base, rel)
    } else {
        format!("{}/{}", base, rel)
    }
}

/// Lists files matching the genome layout under `layout`'s base.
pub fn scan_present(layout: &Layout) -> Result<PresentFileSet> {
    let pattern = pattern_under_base(layout, GENOME_GLOB);
    let mut paths = HashSet::new();
    for entry in glob::glob(&pattern).with_context(|| format!("bad scan pattern {}", pattern))? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("skipping unreadable path during scan: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        match layout.relative_key(&path) {
            Some(rel) => {
                paths.insert(rel);
            }
            None => tracing::debug!("scan hit outside base: {}", path.display()),
        }
    }
    tracing::debug!(present = paths.len(), "scanned {}", pattern);
    Ok(PresentFileSet { paths })
}
