//! Fetch task: bring one required file onto disk.
//!
//! The task never panics or returns an error across its boundary; every path
//! ends in a [`FetchOutcome`] so one file cannot abort the batch.

use anyhow::{Context, Result};
use url::Url;

use crate::layout::Layout;
use crate::manifest::RequiredFile;
use crate::retry::TransferError;
use crate::scan::PresentFileSet;
use crate::storage;
use crate::transport::HttpClient;

/// Result of one fetch task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fetched from the server and written to disk.
    Downloaded,
    /// Found by the start-of-run scan; no request made.
    AlreadyPresent,
    /// Gave up (retries exhausted, permanent error, storage failure, fault).
    Error(String),
    /// The collector stopped waiting on this task.
    Timeout,
}

impl FetchOutcome {
    /// True for outcomes that go on the error list.
    pub fn is_failure(&self) -> bool {
        matches!(self, FetchOutcome::Error(_) | FetchOutcome::Timeout)
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    layout: Layout,
    base_url: Url,
    client: HttpClient,
}

impl Fetcher {
    /// `base_url` is the server root that manifest paths are joined onto.
    pub fn new(layout: Layout, base_url: &str, client: HttpClient) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("invalid base URL {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("base URL {} cannot have paths joined onto it", base_url);
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            layout,
            base_url,
            client,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Source URL for a manifest entry.
    pub fn source_url(&self, file: &RequiredFile) -> Result<Url, TransferError> {
        self.base_url
            .join(&file.path)
            .map_err(|e| TransferError::InvalidUrl(format!("{}: {}", file.path, e)))
    }

    /// Skip files found by the scan; otherwise download and write to disk.
    pub fn fetch(&self, file: &RequiredFile, present: &PresentFileSet) -> FetchOutcome {
        if present.contains(&file.path) {
            return FetchOutcome::AlreadyPresent;
        }
        match self.download(file) {
            Ok(bytes) => {
                tracing::debug!(bytes, "downloaded {}", file.path);
                FetchOutcome::Downloaded
            }
            Err(e) => {
                tracing::warn!("error downloading {}: {}", file.path, e);
                FetchOutcome::Error(e.to_string())
            }
        }
    }

    fn download(&self, file: &RequiredFile) -> Result<usize, TransferError> {
        let url = self.source_url(file)?;
        storage::ensure_dir(&self.layout.dir_path(&file.subdir))?;
        let body = self.client.get(url.as_str())?;
        storage::write_finalized(&self.layout.file_path(&file.path), &body)?;
        Ok(body.len())
    }
}
