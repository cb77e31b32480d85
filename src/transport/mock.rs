//! Scripted mock transport for tests.
//!
//! Each URL can be given a script of outcomes consumed one per `poll`; URLs
//! without a script (or with an exhausted one) report a default outcome.
//! Begin/cancel calls and simulated saves are recorded for assertions.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{Outcome, Transfer, Transport};

/// Everything the mock observed, shared between the transport and its
/// outstanding transfer handles.
#[derive(Debug, Default)]
struct Recorder {
    begun: Vec<String>,
    cancelled: Vec<String>,
    saved: Vec<(PathBuf, String)>,
}

/// A mock transport driven by per-URL outcome scripts.
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Outcome>>>,
    default_outcome: Outcome,
    recorder: Arc<Mutex<Recorder>>,
}

impl MockTransport {
    /// Mock whose polls always report `outcome` (unless a script overrides it).
    pub fn always(outcome: Outcome) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            default_outcome: outcome,
            recorder: Arc::new(Mutex::new(Recorder::default())),
        }
    }

    /// Queue `outcomes` for polls of `url`, consumed in order. Once the script
    /// runs out, polls fall back to the default outcome.
    pub fn with_script(self, url: &str, outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), outcomes.into_iter().collect());
        self
    }

    /// URLs passed to `begin`, in call order.
    pub fn begun_urls(&self) -> Vec<String> {
        self.recorder.lock().unwrap().begun.clone()
    }

    /// URLs whose transfers were cancelled, in call order. A transfer is
    /// recorded at most once no matter how often it is cancelled.
    pub fn cancelled_urls(&self) -> Vec<String> {
        self.recorder.lock().unwrap().cancelled.clone()
    }

    /// Simulated saves: `(download_dir, file name derived from the URL)` for
    /// every transfer that reported `Success`.
    pub fn saved_files(&self) -> Vec<(PathBuf, String)> {
        self.recorder.lock().unwrap().saved.clone()
    }
}

impl Transport for MockTransport {
    fn begin(&self, url: &str, download_dir: &Path) -> Box<dyn Transfer> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .remove(url)
            .unwrap_or_default();
        let mut recorder = self.recorder.lock().unwrap();
        recorder.begun.push(url.to_string());
        Box::new(MockTransfer {
            url: url.to_string(),
            download_dir: download_dir.to_path_buf(),
            script,
            default_outcome: self.default_outcome,
            recorder: Arc::clone(&self.recorder),
            cancelled: false,
            saved: false,
        })
    }
}

struct MockTransfer {
    url: String,
    download_dir: PathBuf,
    script: VecDeque<Outcome>,
    default_outcome: Outcome,
    recorder: Arc<Mutex<Recorder>>,
    cancelled: bool,
    saved: bool,
}

/// "www.example.org/cat.jpeg" -> "cat.jpeg"
fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

impl Transfer for MockTransfer {
    fn poll(&mut self) -> Outcome {
        let outcome = self.script.pop_front().unwrap_or(self.default_outcome);
        if outcome == Outcome::Success && !self.saved {
            self.saved = true;
            self.recorder
                .lock()
                .unwrap()
                .saved
                .push((self.download_dir.clone(), file_name(&self.url).to_string()));
        }
        outcome
    }

    fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.recorder.lock().unwrap().cancelled.push(self.url.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_consumed_then_default_applies() {
        let transport = MockTransport::always(Outcome::InProgress)
            .with_script("http://x/a", [Outcome::Timeout, Outcome::Success]);
        let mut transfer = transport.begin("http://x/a", Path::new("/tmp/dl"));
        assert_eq!(transfer.poll(), Outcome::Timeout);
        assert_eq!(transfer.poll(), Outcome::Success);
        assert_eq!(transfer.poll(), Outcome::InProgress);
        assert_eq!(transport.begun_urls(), vec!["http://x/a"]);
    }

    #[test]
    fn success_records_a_saved_file_once() {
        let transport = MockTransport::always(Outcome::Success);
        let mut transfer = transport.begin("www.example.org/cat.jpeg", Path::new("/some/dir"));
        transfer.poll();
        transfer.poll();
        assert_eq!(
            transport.saved_files(),
            vec![(PathBuf::from("/some/dir"), "cat.jpeg".to_string())]
        );
    }

    #[test]
    fn cancel_is_idempotent() {
        let transport = MockTransport::always(Outcome::InProgress);
        let mut transfer = transport.begin("http://x/b", Path::new("/tmp/dl"));
        transfer.cancel();
        transfer.cancel();
        assert_eq!(transport.cancelled_urls(), vec!["http://x/b"]);
    }
}
