//! Bounded-parallel fetch scheduler.
//!
//! Runs one task per required file on at most `worker_limit` OS threads and
//! collects outcomes in completion order on the calling thread. The collector
//! owns the error list; workers only send messages. A task that runs past the
//! collect timeout is recorded as [`FetchOutcome::Timeout`] and left to finish;
//! its late outcome is dropped, but `run` still joins it before returning so
//! anything it wrote is on disk for reconciliation.

mod collect;
mod outcome;
mod pool;


use std::sync::{mpsc, Arc};
use std::time::Duration;

use crate::fetch::FetchOutcome;
use crate::manifest::RequiredFile;

pub use outcome::{ErrorList, RunReport, TaskOutcome};

#[derive(Debug, Clone, Copy)]
pub struct SchedulerOptions {
    /// Maximum number of tasks running at once.
    pub worker_limit: usize,
    /// How long a started task may run before it is recorded as timed out.
    pub collect_timeout: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            worker_limit: 4,
            collect_timeout: Duration::from_secs(30),
        }
    }
}

/// Progress notifications, delivered on the collecting thread.
#[derive(Debug, Clone, Copy)]
pub enum TaskEvent<'a> {
    /// A worker picked up the file.
    Started(&'a RequiredFile),
    /// The file's one outcome was recorded.
    Completed(&'a RequiredFile, &'a FetchOutcome),
}

/// Run `task` for every file and return once each file has exactly one outcome.
pub fn run<F, E>(files: &[RequiredFile], opts: &SchedulerOptions, task: F, on_event: E) -> RunReport
where
    F: Fn(&RequiredFile) -> FetchOutcome + Send + Sync + 'static,
    E: FnMut(TaskEvent<'_>),
{
    if files.is_empty() {
        return RunReport::default();
    }
    let workers = opts.worker_limit.max(1).min(files.len());
    tracing::debug!(files = files.len(), workers, "starting fetch pool");

    let (tx, rx) = mpsc::channel();
    let handles = pool::spawn(Arc::new(files.to_vec()), workers, Arc::new(task), tx);
    let collected = collect::collect(files, rx, opts.collect_timeout, on_event);
    pool::reap(handles, collected.abandoned);

    tracing::debug!(
        downloaded = collected.report.downloaded(),
        present = collected.report.already_present(),
        failed = collected.report.errors.len(),
        "fetch pool drained"
    );
    collected.report
}
