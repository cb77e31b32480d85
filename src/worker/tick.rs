//! One scheduling pass: admission, per-item advancement, breaker drain.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;

use crate::retry::{classify, RetryPolicy, Verdict};
use crate::transport::{Outcome, Transport};

use super::item::{Completion, Item, Phase};
use super::Shared;

/// Owns the active item list and drives it one tick at a time. Only the
/// spawned worker task holds a `Session`; everything callers touch lives in
/// `Shared`.
pub(crate) struct Session {
    shared: Arc<Shared>,
    transport: Arc<dyn Transport>,
    download_dir: PathBuf,
    policy: RetryPolicy,
    active: Vec<Item>,
}

impl Session {
    pub(crate) fn new(
        shared: Arc<Shared>,
        transport: Arc<dyn Transport>,
        download_dir: PathBuf,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            shared,
            transport,
            download_dir,
            policy,
            active: Vec::new(),
        }
    }

    /// One tick: admit queued URLs, advance every active item in order, and
    /// once the breaker is tripped drain-and-cancel everything. `Break` means
    /// the session is over and the tick loop must exit.
    pub(crate) fn tick(&mut self) -> ControlFlow<()> {
        self.admit();

        if !self.shared.breaker_tripped() {
            self.advance();
        }

        if self.shared.breaker_tripped() {
            self.drain();
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    /// Move every queued URL into the active set, preserving enqueue order.
    fn admit(&mut self) {
        for url in self.shared.take_pending() {
            tracing::debug!(url = %url, "download admitted");
            self.active.push(Item::new(url));
        }
    }

    /// Advance each item once, rebuilding the active list from the survivors
    /// so finished items drop out without index juggling. Stops early when the
    /// breaker trips mid-pass; unprocessed items are carried over untouched
    /// for the drain.
    fn advance(&mut self) {
        let mut survivors = Vec::with_capacity(self.active.len());
        for mut item in std::mem::take(&mut self.active) {
            if self.shared.breaker_tripped() {
                survivors.push(item);
                continue;
            }
            self.step(&mut item);
            if !item.is_done() {
                survivors.push(item);
            }
        }
        self.active = survivors;
    }

    /// Run one item through the state machine: start a pending transfer, then
    /// poll the bound handle. Starting happens strictly before polling, so a
    /// handle is never polled unbound; a transfer that succeeds on its first
    /// poll finishes within this same pass.
    fn step(&mut self, item: &mut Item) {
        if let Phase::Pending = item.phase {
            tracing::debug!(url = %item.url, "starting transfer");
            item.transfer = Some(self.transport.begin(&item.url, &self.download_dir));
            item.phase = Phase::Active;
        }

        let Some(transfer) = item.transfer.as_mut() else {
            return;
        };

        let outcome = transfer.poll();
        if let Outcome::Success = outcome {
            tracing::info!(url = %item.url, "download complete");
            item.phase = Phase::Done(Completion::Success);
            return;
        }
        let Some(kind) = classify(&outcome) else {
            // InProgress: still running, nothing to do this tick.
            return;
        };

        match self.policy.decide(item.attempts, kind) {
            Verdict::Retry => {
                item.attempts += 1;
                tracing::debug!(
                    url = %item.url,
                    attempts = item.attempts,
                    ?kind,
                    "retrying next tick"
                );
            }
            Verdict::Fail => {
                tracing::warn!(url = %item.url, ?kind, "download failed");
                self.shared.record_failure(item.url.clone());
                item.phase = Phase::Done(Completion::Failure);
            }
            Verdict::TripBreaker => {
                tracing::error!(url = %item.url, ?kind, "retries exhausted, tripping breaker");
                self.shared.trip_breaker();
            }
        }
    }

    /// Abandon all remaining work, front to back: cancel the transfer of
    /// every item that was running and record every remaining URL as failed,
    /// whatever its phase.
    fn drain(&mut self) {
        for mut item in self.active.drain(..) {
            if let Phase::Active = item.phase {
                if let Some(transfer) = item.transfer.as_mut() {
                    transfer.cancel();
                }
            }
            self.shared.record_failure(item.url);
        }
        tracing::info!("session drained after breaker trip");
    }

    #[cfg(test)]
    pub(crate) fn active_count(&self) -> usize {
        self.active.len()
    }
}
