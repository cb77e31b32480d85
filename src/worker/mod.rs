//! Download worker: FIFO admission, per-tick advancement, global breaker.
//!
//! External callers interact through [`DownloadWorker`]. All mutable session
//! state lives either in [`Shared`] (pending queue, failure list, breaker
//! flag, guarded for concurrent producers) or inside the single spawned task
//! that owns the active items.

mod item;
mod tick;


use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;

use crate::config::FetchqConfig;
use crate::retry::RetryPolicy;
use crate::transport::Transport;

use tick::Session;

/// Error returned by worker calls once the session has stopped.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The breaker has tripped (retry exhaustion or explicit stop); the
    /// session only drains from here and accepts no new URLs.
    #[error("worker stopped: not accepting new downloads")]
    Stopped,
}

/// State shared between the worker handle and the spawned session task.
pub(crate) struct Shared {
    /// URLs accepted but not yet admitted into the active set. FIFO.
    pending: Mutex<VecDeque<String>>,
    /// URLs that terminated unsuccessfully, in failure order. Append-only.
    failed: Mutex<Vec<String>>,
    /// One-way valve: false → true once, never reset.
    breaker: AtomicBool,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            failed: Mutex::new(Vec::new()),
            breaker: AtomicBool::new(false),
        }
    }

    pub(crate) fn push_pending(&self, url: String) {
        self.pending.lock().unwrap().push_back(url);
    }

    /// Take the whole pending queue, leaving it empty.
    pub(crate) fn take_pending(&self) -> VecDeque<String> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }

    pub(crate) fn record_failure(&self, url: String) {
        self.failed.lock().unwrap().push(url);
    }

    pub(crate) fn failed_snapshot(&self) -> Vec<String> {
        self.failed.lock().unwrap().clone()
    }

    pub(crate) fn trip_breaker(&self) {
        self.breaker.store(true, Ordering::Relaxed);
    }

    pub(crate) fn breaker_tripped(&self) -> bool {
        self.breaker.load(Ordering::Relaxed)
    }
}

/// Bounded download queue with per-URL retry and a one-way circuit breaker.
///
/// URLs are enqueued at any time and admitted on the next tick of a
/// fixed-period loop. Each tick every active URL is advanced once through its
/// state machine via the [`Transport`]. When a transient error exhausts its
/// retry budget the breaker trips: all in-flight and pending work is
/// cancelled and drained into the failure list, and the loop exits.
///
/// ```no_run
/// use std::sync::Arc;
/// use fetchq::config::FetchqConfig;
/// use fetchq::transport::mock::MockTransport;
/// use fetchq::transport::Outcome;
/// use fetchq::worker::DownloadWorker;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = FetchqConfig::default();
/// let transport = Arc::new(MockTransport::always(Outcome::Success));
/// let worker = DownloadWorker::new(&config, transport);
///
/// let handle = worker.start();
/// worker.enqueue("www.example.org/cat.jpeg")?;
///
/// // ... later: end the session and collect what failed.
/// worker.stop();
/// handle.await?;
/// let _failed = worker.failed_urls();
/// # Ok(())
/// # }
/// ```
pub struct DownloadWorker {
    shared: Arc<Shared>,
    transport: Arc<dyn Transport>,
    download_dir: PathBuf,
    policy: RetryPolicy,
    tick_interval: Duration,
}

impl DownloadWorker {
    /// Create a worker for one download session. The download directory is
    /// passed through to the transport untouched.
    pub fn new(config: &FetchqConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            transport,
            download_dir: config.download_dir.clone(),
            policy: RetryPolicy::new(config.max_attempts),
            tick_interval: config.tick_interval(),
        }
    }

    /// Queue a URL for download. Takes effect on the next tick. Fails with
    /// [`WorkerError::Stopped`] once the breaker has tripped.
    pub fn enqueue(&self, url: impl Into<String>) -> Result<(), WorkerError> {
        if self.shared.breaker_tripped() {
            return Err(WorkerError::Stopped);
        }
        self.shared.push_pending(url.into());
        Ok(())
    }

    /// Spawn the tick loop. Call once per worker. The returned handle
    /// resolves after the session has drained following a breaker trip or
    /// [`stop`](Self::stop).
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        let mut session = Session::new(
            Arc::clone(&self.shared),
            Arc::clone(&self.transport),
            self.download_dir.clone(),
            self.policy,
        );
        let period = self.tick_interval;

        tokio::spawn(async move {
            tracing::info!("download worker started");
            let mut ticker = tokio::time::interval(period);
            // A slow tick must not cause overlapping or bursting passes.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if session.tick().is_break() {
                    break;
                }
            }
            tracing::info!("download worker stopped");
        })
    }

    /// Trip the breaker. Idempotent; the next tick cancels running transfers,
    /// records every remaining URL as failed, and ends the session.
    pub fn stop(&self) {
        self.shared.trip_breaker();
    }

    /// Ordered snapshot of the URLs that have failed so far. Safe to call
    /// while the session is running.
    pub fn failed_urls(&self) -> Vec<String> {
        self.shared.failed_snapshot()
    }
}
