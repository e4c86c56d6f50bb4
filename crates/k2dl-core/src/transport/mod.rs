//! HTTP transport: given a URL, return the body bytes or a classified error.
//!
//! A [`Transport`] opens one [`Session`] per fetch task. The session is reused
//! for every retry of that task and released when it is dropped, whichever way
//! the task ends. [`HttpClient`] owns the retry policy and drives the loop.

mod easy;

use std::sync::Arc;

use crate::retry::{run_with_retry, Method, RetryPolicy, TransferError};

pub use easy::{CurlOptions, CurlTransport};

/// One network session (connection state) owned by a single task.
pub trait Session {
    /// Perform one GET attempt and return the full response body on 2xx.
    fn get(&mut self, url: &str) -> Result<Vec<u8>, TransferError>;
}

/// Opens sessions; shared by all workers.
pub trait Transport: Send + Sync {
    fn open(&self) -> Result<Box<dyn Session + '_>, TransferError>;
}

/// Transport plus explicit retry policy.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// libcurl-backed client.
    pub fn curl(opts: CurlOptions, policy: RetryPolicy) -> Self {
        Self::new(Arc::new(CurlTransport::new(opts)), policy)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `url`, retrying transient failures per the policy on one session.
    pub fn get(&self, url: &str) -> Result<Vec<u8>, TransferError> {
        let mut session = self.transport.open()?;
        run_with_retry(&self.policy, Method::Get, |attempt| {
            tracing::trace!(attempt, "GET {}", url);
            session.get(url)
        })
    }
}
