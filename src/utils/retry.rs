//! Retry utilities: backoff builders and retryable error classification.
//!
//! Uses `backon` for exponential backoff with jitter. Only outbound HTTP
//! calls retry; purchase transactions never do.

use std::time::Duration;

use backon::ExponentialBuilder;
use reqwest::StatusCode;

/// Backoff for catalog source HTTP requests.
///
/// - Min delay: 200ms
/// - Max delay: 2s
/// - Max attempts: 3
/// - Jitter enabled
pub fn fetch_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(200))
        .with_max_delay(Duration::from_secs(2))
        .with_max_times(3)
        .with_jitter()
}

/// Determines if an HTTP status is worth retrying.
///
/// Retryable: 429 (rate limit) and 5xx. Everything else (bad key, unknown
/// movie) fails the same way again.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Determines if an HTTP error is transient.
pub fn is_retryable_http(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.status().is_some_and(is_retryable_status)
}
