//! Retry and backoff policy.
//!
//! Error classification (timeouts, interrupted transfers, connection failures,
//! HTTP status) and backoff decisions live here so the HTTP client and the
//! fetch task share one explicit policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::TransferError;
pub use policy::{ErrorKind, Method, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
