//! Single-consumer collection loop.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use super::outcome::RunReport;
use super::pool::WorkerMsg;
use super::TaskEvent;
use crate::fetch::FetchOutcome;
use crate::manifest::RequiredFile;

pub(super) struct Collected {
    pub(super) report: RunReport,
    /// Tasks recorded as timed out while still running.
    pub(super) abandoned: usize,
}

struct Collector<'a, E> {
    files: &'a [RequiredFile],
    recorded: Vec<bool>,
    remaining: usize,
    report: RunReport,
    on_event: E,
}

impl<'a, E: FnMut(TaskEvent<'_>)> Collector<'a, E> {
    fn record(&mut self, index: usize, outcome: FetchOutcome) {
        if self.recorded[index] {
            return;
        }
        self.recorded[index] = true;
        self.remaining -= 1;
        let files = self.files;
        let file = &files[index];
        (self.on_event)(TaskEvent::Completed(file, &outcome));
        self.report.push(file.clone(), outcome);
    }
}

/// Time until the oldest in-flight task hits its deadline.
fn next_wait(in_flight: &HashMap<usize, Instant>, timeout: Duration, now: Instant) -> Duration {
    in_flight
        .values()
        .map(|&at| match at.checked_add(timeout) {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => timeout,
        })
        .min()
        .unwrap_or(timeout)
}

/// Receive until every file has one outcome or all workers are gone.
pub(super) fn collect<E>(
    files: &[RequiredFile],
    rx: Receiver<WorkerMsg>,
    timeout: Duration,
    on_event: E,
) -> Collected
where
    E: FnMut(TaskEvent<'_>),
{
    let mut c = Collector {
        files,
        recorded: vec![false; files.len()],
        remaining: files.len(),
        report: RunReport::with_capacity(files.len()),
        on_event,
    };
    let mut in_flight: HashMap<usize, Instant> = HashMap::new();
    let mut abandoned = 0usize;

    while c.remaining > 0 {
        let wait = next_wait(&in_flight, timeout, Instant::now());
        match rx.recv_timeout(wait) {
            Ok(WorkerMsg::Started { index, at }) => {
                in_flight.insert(index, at);
                (c.on_event)(TaskEvent::Started(&files[index]));
            }
            Ok(WorkerMsg::Finished { index, outcome }) => {
                in_flight.remove(&index);
                if c.recorded[index] {
                    tracing::info!(
                        "discarding late outcome for {} ({:?})",
                        files[index].path,
                        outcome
                    );
                    continue;
                }
                c.record(index, outcome);
            }
            Err(RecvTimeoutError::Timeout) => {
                let now = Instant::now();
                let mut expired: Vec<usize> = in_flight
                    .iter()
                    .filter(|(_, &at)| now.saturating_duration_since(at) >= timeout)
                    .map(|(&index, _)| index)
                    .collect();
                expired.sort_unstable();
                for index in expired {
                    in_flight.remove(&index);
                    abandoned += 1;
                    tracing::warn!(
                        "no outcome for {} after {:?}; recording timeout",
                        files[index].path,
                        timeout
                    );
                    c.record(index, FetchOutcome::Timeout);
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::error!(
                    missing = c.remaining,
                    "all workers exited before reporting every outcome"
                );
                for index in 0..files.len() {
                    c.record(
                        index,
                        FetchOutcome::Error("worker exited before reporting an outcome".to_string()),
                    );
                }
                break;
            }
        }
    }

    Collected {
        report: c.report,
        abandoned,
    }
}
