//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::TransferError;
use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match u16::try_from(code) {
        Ok(code) => ErrorKind::Status(code),
        Err(_) => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect() || e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return ErrorKind::Connection;
    }
    if e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Interrupted;
    }
    ErrorKind::Other
}

/// Classify a transfer error (curl, HTTP, URL, storage) into an ErrorKind.
pub fn classify(e: &TransferError) -> ErrorKind {
    match e {
        TransferError::Curl(ce) => classify_curl_error(ce),
        TransferError::Http(code) => classify_http_status(*code),
        TransferError::InvalidUrl(_) | TransferError::Storage(_) => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // libcurl error codes
    const CURLE_COULDNT_RESOLVE_HOST: u32 = 6;
    const CURLE_COULDNT_CONNECT: u32 = 7;
    const CURLE_PARTIAL_FILE: u32 = 18;
    const CURLE_OPERATION_TIMEDOUT: u32 = 28;
    const CURLE_GOT_NOTHING: u32 = 52;

    #[test]
    fn http_status_keeps_code() {
        assert_eq!(classify_http_status(503), ErrorKind::Status(503));
        assert_eq!(classify_http_status(404), ErrorKind::Status(404));
    }

    #[test]
    fn curl_timeout_is_timeout() {
        let e = curl::Error::new(CURLE_OPERATION_TIMEDOUT);
        assert_eq!(classify_curl_error(&e), ErrorKind::Timeout);
    }

    #[test]
    fn curl_refused_and_dns_are_connection() {
        assert_eq!(
            classify_curl_error(&curl::Error::new(CURLE_COULDNT_CONNECT)),
            ErrorKind::Connection
        );
        assert_eq!(
            classify_curl_error(&curl::Error::new(CURLE_COULDNT_RESOLVE_HOST)),
            ErrorKind::Connection
        );
    }

    #[test]
    fn curl_cut_short_is_interrupted() {
        assert_eq!(
            classify_curl_error(&curl::Error::new(CURLE_GOT_NOTHING)),
            ErrorKind::Interrupted
        );
        assert_eq!(
            classify_curl_error(&curl::Error::new(CURLE_PARTIAL_FILE)),
            ErrorKind::Interrupted
        );
    }

    #[test]
    fn storage_and_url_errors_are_other() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(classify(&TransferError::Storage(io)), ErrorKind::Other);
        assert_eq!(
            classify(&TransferError::InvalidUrl("x".into())),
            ErrorKind::Other
        );
    }
}
