//! Reconciliation: re-check failed files against disk after the pool drains.
//!
//! A task can report a failure for a file that is nevertheless on disk (written
//! by a task whose result was dropped at the collect timeout, or by another
//! process). Only files still absent are true failures.

use crate::layout::Layout;
use crate::scan::pattern_under_base;

/// Partition of the error list. `reconciled ∪ unresolved` is the error list
/// and the two never overlap; each keeps error-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalReport {
    /// Reported as failed but present on disk; treated as success.
    pub reconciled: Vec<String>,
    /// Still absent; true failures.
    pub unresolved: Vec<String>,
}

impl FinalReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// True when `rel` exists as a file under the base. Reads the filesystem directly.
pub fn exists_on_disk(layout: &Layout, rel: &str) -> bool {
    let pattern = pattern_under_base(layout, &glob::Pattern::escape(rel));
    match glob::glob(&pattern) {
        Ok(mut paths) => paths.any(|p| matches!(p, Ok(ref path) if path.is_file())),
        Err(e) => {
            tracing::warn!("cannot check {} on disk: {}", rel, e);
            false
        }
    }
}

/// Split `errors` into files found on disk and files still missing.
pub fn reconcile(errors: &[String], layout: &Layout) -> FinalReport {
    let (reconciled, unresolved): (Vec<String>, Vec<String>) = errors
        .iter()
        .cloned()
        .partition(|rel| exists_on_disk(layout, rel));
    if !reconciled.is_empty() {
        tracing::info!(count = reconciled.len(), "failed files found on disk after all");
    }
    FinalReport {
        reconciled,
        unresolved,
    }
}
