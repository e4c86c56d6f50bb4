//! Worker threads pulling file indices from a shared counter.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::fetch::FetchOutcome;
use crate::manifest::RequiredFile;

/// Message from a worker to the collector.
pub(super) enum WorkerMsg {
    Started { index: usize, at: Instant },
    Finished { index: usize, outcome: FetchOutcome },
}

/// Spawn up to `workers` threads. Threads that fail to spawn are logged and skipped;
/// if none start, the channel disconnects and the collector fails every file.
pub(super) fn spawn<F>(
    files: Arc<Vec<RequiredFile>>,
    workers: usize,
    task: Arc<F>,
    tx: Sender<WorkerMsg>,
) -> Vec<JoinHandle<()>>
where
    F: Fn(&RequiredFile) -> FetchOutcome + Send + Sync + 'static,
{
    let next = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::with_capacity(workers);
    for i in 0..workers {
        let files = Arc::clone(&files);
        let next = Arc::clone(&next);
        let task = Arc::clone(&task);
        let tx = tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("k2dl-worker-{}", i))
            .spawn(move || work(&files, &next, task.as_ref(), &tx));
        match spawned {
            Ok(h) => handles.push(h),
            Err(e) => tracing::error!("could not start worker {}: {}", i, e),
        }
    }
    handles
}

fn work<F>(files: &[RequiredFile], next: &AtomicUsize, task: &F, tx: &Sender<WorkerMsg>)
where
    F: Fn(&RequiredFile) -> FetchOutcome,
{
    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(file) = files.get(index) else {
            return;
        };
        if tx.send(WorkerMsg::Started { index, at: Instant::now() }).is_err() {
            return;
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(file))).unwrap_or_else(|payload| {
            let msg = panic_message(payload.as_ref());
            tracing::error!("fetch task for {} panicked: {}", file.path, msg);
            FetchOutcome::Error(format!("task panicked: {}", msg))
        });
        // Receiver gone means the collector already finished; nothing left to report to.
        if tx.send(WorkerMsg::Finished { index, outcome }).is_err() {
            return;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Join every worker. Threads still running abandoned tasks are waited for so
/// their writes land before the caller re-checks the disk.
pub(super) fn reap(handles: Vec<JoinHandle<()>>, abandoned: usize) {
    if abandoned > 0 {
        tracing::info!(abandoned, "waiting for timed-out tasks to finish");
    }
    for h in handles {
        if h.join().is_err() {
            tracing::warn!("fetch worker exited with a panic");
        }
    }
}
