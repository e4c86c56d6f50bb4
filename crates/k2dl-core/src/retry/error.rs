//! Transfer error type for retry classification.

use thiserror::Error;

/// Error returned by a single GET attempt (curl failure, HTTP error, or storage failure).
/// Kept typed so we can classify and decide retries before it becomes a report string.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Source URL could not be built from the base URL and manifest path.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Writing the body to disk failed (disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
