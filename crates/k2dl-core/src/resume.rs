//! End-to-end resume pipeline: plan from disk, fetch, reconcile.

use anyhow::Result;
use std::sync::Arc;

use crate::fetch::{FetchOutcome, Fetcher};
use crate::layout::Layout;
use crate::manifest::{self, Manifest};
use crate::reconcile::{self, FinalReport};
use crate::scan::{self, PresentFileSet};
use crate::scheduler::{self, RunReport, SchedulerOptions, TaskEvent};

/// Everything derived from disk before any network activity.
#[derive(Debug, Clone)]
pub struct Plan {
    pub manifest: Manifest,
    pub present: Arc<PresentFileSet>,
}

impl Plan {
    /// Manifest entries not found by the scan.
    pub fn missing_count(&self) -> usize {
        self.manifest
            .files()
            .iter()
            .filter(|f| !self.present.contains(&f.path))
            .count()
    }
}

/// Load the manifest (fatal if absent), then scan for present files.
pub fn plan(layout: &Layout) -> Result<Plan> {
    let manifest = manifest::load(layout)?;
    let present = scan::scan_present(layout)?;
    tracing::info!(
        required = manifest.len(),
        present = present.len(),
        "planned resume under {}",
        layout.base().display()
    );
    Ok(Plan {
        manifest,
        present: Arc::new(present),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeReport {
    pub run: RunReport,
    pub final_report: FinalReport,
}

impl ResumeReport {
    pub fn outcome_for(&self, path: &str) -> Option<&FetchOutcome> {
        self.run.outcome_for(path)
    }
}

/// Fetch every manifest entry through the pool, then reconcile failures on disk.
pub fn execute<E>(
    plan: &Plan,
    fetcher: Arc<Fetcher>,
    opts: &SchedulerOptions,
    on_event: E,
) -> ResumeReport
where
    E: FnMut(TaskEvent<'_>),
{
    let present = Arc::clone(&plan.present);
    let layout = fetcher.layout().clone();
    let run = scheduler::run(
        plan.manifest.files(),
        opts,
        move |file| fetcher.fetch(file, &present),
        on_event,
    );
    let final_report = reconcile::reconcile(&run.errors, &layout);
    ResumeReport { run, final_report }
}

/// True when a `Started` event will lead to a network download.
pub fn will_download(plan: &Plan, event: &TaskEvent<'_>) -> bool {
    matches!(event, TaskEvent::Started(f) if !plan.present.contains(&f.path))
}
