//! Classify transport outcomes into retry policy error kinds.

use crate::transport::Outcome;

/// HTTP statuses that fail a URL immediately instead of burning attempts:
/// request timeout, bad gateway, service unavailable, gateway timeout.
pub const FAIL_FAST_STATUSES: [u16; 4] = [408, 502, 503, 504];

/// High-level classification of a failed poll for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network-level failure. Retried; exhausting attempts trips the breaker.
    Connection,
    /// Connect/read timeout. Same handling as `Connection`.
    Timeout,
    /// Gateway/availability status: the URL is recorded as failed at once and
    /// never retried, whatever the attempt count.
    HttpFailFast(u16),
    /// Any other non-success HTTP status. Retried; exhausting attempts fails
    /// the URL without touching the breaker.
    HttpOther(u16),
}

/// Classify an outcome. Returns `None` for `Success` and `InProgress`, which
/// carry no error to classify.
pub fn classify(outcome: &Outcome) -> Option<ErrorKind> {
    match outcome {
        Outcome::Success | Outcome::InProgress => None,
        Outcome::ConnectionError => Some(ErrorKind::Connection),
        Outcome::Timeout => Some(ErrorKind::Timeout),
        Outcome::HttpError(code) if FAIL_FAST_STATUSES.contains(code) => {
            Some(ErrorKind::HttpFailFast(*code))
        }
        Outcome::HttpError(code) => Some(ErrorKind::HttpOther(*code)),
    }
}
