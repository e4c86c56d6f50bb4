use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Transfer started but was cut short (reset, empty reply, short body).
    Interrupted,
    /// Could not reach the server at all (DNS failure, connection refused).
    Connection,
    /// Server answered with this non-2xx status.
    Status(u16),
    /// Any other error (bad URL, storage, protocol misuse).
    Other,
}

/// Idempotent request methods the client can issue and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Options,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Explicit retry configuration handed to the HTTP client.
///
/// The backoff schedule is `0, factor, 2*factor, 4*factor, ...` for the
/// first, second, third, ... retry.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Backoff factor.
    pub backoff_factor: Duration,
    /// HTTP statuses treated as transient.
    pub status_forcelist: Vec<u16>,
    /// Methods that may be retried at all.
    pub allowed_methods: Vec<Method>,
    /// Upper bound on a single backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_factor: Duration::from_secs(1),
            status_forcelist: vec![500, 502, 503, 504],
            allowed_methods: vec![Method::Head, Method::Get, Method::Options],
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Whether an error of this kind is worth another attempt.
    pub fn is_transient(&self, kind: ErrorKind) -> bool {
        match kind {
            ErrorKind::Timeout | ErrorKind::Interrupted => true,
            ErrorKind::Status(code) => self.status_forcelist.contains(&code),
            ErrorKind::Connection | ErrorKind::Other => false,
        }
    }

    /// Delay before the `retry`-th retry (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let exp = 1u32 << (retry - 2).min(16);
        self.backoff_factor.saturating_mul(exp).min(self.max_delay)
    }

    /// Decide what to do after `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, method: Method, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts
            || !self.allowed_methods.contains(&method)
            || !self.is_transient(kind)
        {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff(attempt))
    }
}
