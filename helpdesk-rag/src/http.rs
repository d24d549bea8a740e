//! Shared HTTP plumbing for the upstream clients

use std::error::Error as _;
use std::time::Duration;

/// HTTP client shared by the upstream clients, bounded by `timeout`
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// A transport failure with its cause chain, prefixed by what went wrong.
///
/// `reqwest` keeps the useful part ("operation timed out", "Connection
/// refused") in the source chain rather than in its own message.
pub fn describe_transport_error(error: &reqwest::Error) -> String {
    let mut detail = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.contains(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }

    if error.is_timeout() {
        format!("request timed out ({})", detail)
    } else if error.is_connect() {
        format!("connection failed ({})", detail)
    } else {
        detail
    }
}
