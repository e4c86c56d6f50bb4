//! libcurl transport: one `Easy` handle per session.

use std::time::Duration;

use super::{Session, Transport};
use crate::retry::TransferError;

/// Timeouts applied to every GET attempt.
#[derive(Debug, Clone, Copy)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Abort when no data arrives for this long. A slow but steady body is not cut off.
    pub request_timeout: Duration,
    /// Hard cap on one attempt so a transfer that never finishes eventually fails.
    pub max_transfer_time: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            max_transfer_time: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: CurlOptions,
}

impl CurlTransport {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }
}

impl Transport for CurlTransport {
    fn open(&self) -> Result<Box<dyn Session + '_>, TransferError> {
        let mut easy = curl::easy::Easy::new();
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        // Below 1 byte/s for `request_timeout` counts as stalled.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.opts.request_timeout)?;
        easy.timeout(self.opts.max_transfer_time)?;
        easy.useragent(concat!("k2dl/", env!("CARGO_PKG_VERSION")))?;
        Ok(Box::new(CurlSession { easy }))
    }
}

/// Dropping the session drops the handle and closes its connections.
struct CurlSession {
    easy: curl::easy::Easy,
}

impl Session for CurlSession {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, TransferError> {
        let mut body = Vec::new();
        self.easy.url(url)?;
        self.easy.get(true)?;
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = self.easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransferError::Http(code));
        }
        Ok(body)
    }
}
