//! Transport contract: the collaborator that performs the actual transfer.
//!
//! The worker only ever observes a transfer through `poll` outcomes; starting,
//! persisting and aborting transfers are the transport's business. The worker
//! never touches storage itself.

pub mod mock;

use std::path::Path;

/// Classified result of polling a transfer once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Transfer complete and persisted by the transport.
    Success,
    /// Still running; nothing to do this tick.
    InProgress,
    /// Network-level failure (connection reset, DNS, refused).
    ConnectionError,
    /// Connect or read timeout.
    Timeout,
    /// Response carried a non-success HTTP status.
    HttpError(u16),
}

/// Starts transfers. `begin` must not block; begin-time failures surface
/// through the returned handle's `poll`, not a `Result`.
pub trait Transport: Send + Sync {
    /// Initiate a transfer of `url` into `download_dir` and return the handle
    /// used for subsequent polling and cancellation.
    fn begin(&self, url: &str, download_dir: &Path) -> Box<dyn Transfer>;
}

/// Handle to one running transfer, owned exclusively by the worker item that
/// started it.
pub trait Transfer: Send {
    /// Non-blocking check of the transfer's current state.
    fn poll(&mut self) -> Outcome;

    /// Best-effort abort. Idempotent; called when the session stops while the
    /// transfer is still running.
    fn cancel(&mut self);
}
