//! What a scheduler run returns.

use crate::fetch::FetchOutcome;
use crate::manifest::RequiredFile;

/// Relative paths of files that ended in `Error` or `Timeout`, in collection order.
pub type ErrorList = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub file: RequiredFile,
    pub outcome: FetchOutcome,
}

/// Every file's outcome in completion order, plus the error list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<TaskOutcome>,
    pub errors: ErrorList,
}

impl RunReport {
    pub(super) fn with_capacity(n: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(n),
            errors: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, file: RequiredFile, outcome: FetchOutcome) {
        if outcome.is_failure() {
            self.errors.push(file.path.clone());
        }
        self.outcomes.push(TaskOutcome { file, outcome });
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcome_for(&self, path: &str) -> Option<&FetchOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.file.path == path)
            .map(|o| &o.outcome)
    }

    fn count(&self, pred: impl Fn(&FetchOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }

    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Downloaded))
    }

    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::AlreadyPresent))
    }

    /// Files that ended in `Error` (not counting timeouts).
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Error(_)))
    }

    pub fn timed_out(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Timeout))
    }
}
