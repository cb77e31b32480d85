//! Per-URL work item and its lifecycle phases.

use crate::transport::Transfer;

/// Terminal disposition of a finished item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    Success,
    Failure,
}

/// Lifecycle phase of a tracked URL. Transitions are monotonic:
/// Pending → Active → Done, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Accepted but no transfer started yet.
    Pending,
    /// Transfer handle bound; polled once per tick.
    Active,
    /// Finished; removed from the active set on the same tick.
    Done(Completion),
}

/// One URL tracked by the worker, with its transfer handle and retry state.
pub(crate) struct Item {
    pub(crate) url: String,
    pub(crate) phase: Phase,
    /// Present iff the phase has left `Pending`. Owned exclusively by the
    /// item, which cancels it on teardown.
    pub(crate) transfer: Option<Box<dyn Transfer>>,
    /// Retryable failures counted so far; never decremented.
    pub(crate) attempts: u32,
}

impl Item {
    pub(crate) fn new(url: String) -> Self {
        Self {
            url,
            phase: Phase::Pending,
            transfer: None,
            attempts: 0,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }
}
