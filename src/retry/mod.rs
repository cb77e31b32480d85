//! Outcome classification and retry policy.
//!
//! Encapsulates which transport outcomes deserve another attempt, which fail
//! the URL at once, and which exhaust the session-wide breaker, so the
//! worker's tick loop dispatches on a single verdict.

mod classify;
mod policy;

pub use classify::{classify, ErrorKind, FAIL_FAST_STATUSES};
pub use policy::{RetryPolicy, Verdict};
