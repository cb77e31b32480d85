//! Attempt-bounded retry policy.

use super::classify::ErrorKind;

/// Decision for one failed poll of an active URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Count one more attempt and poll again next tick.
    Retry,
    /// Terminal for this URL: record it in the failure list.
    Fail,
    /// Session-fatal: trip the global breaker and drain everything.
    TripBreaker,
}

/// Retry policy with a per-URL attempt cap and no backoff: a retried URL is
/// polled again on the very next tick, so retry spacing equals the tick
/// period.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retryable failures allowed per URL before the error becomes terminal.
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Decide what to do with a failed poll. `attempts` is the number of
    /// retryable failures already counted against this URL; it is only
    /// incremented when the verdict is `Retry`, so it never exceeds
    /// `max_attempts + 1`.
    pub fn decide(&self, attempts: u32, kind: ErrorKind) -> Verdict {
        match kind {
            ErrorKind::HttpFailFast(_) => Verdict::Fail,
            ErrorKind::Connection | ErrorKind::Timeout => {
                if attempts > self.max_attempts {
                    Verdict::TripBreaker
                } else {
                    Verdict::Retry
                }
            }
            ErrorKind::HttpOther(_) => {
                if attempts > self.max_attempts {
                    Verdict::Fail
                } else {
                    Verdict::Retry
                }
            }
        }
    }
}
