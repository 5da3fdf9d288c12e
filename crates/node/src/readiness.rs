//! Detects when the supervised node is ready by scanning its output for a sentinel line.
//!
//! Each supervised process owns one [`LogSubscription`]: the reader tasks attached to its stdout
//! and stderr plus the buffer they fill. Until the sentinel shows up every chunk is buffered so
//! a startup failure can be reported with the full output. Once ready, the buffer is dropped and
//! the streams are only drained (and echoed to the log when verbose), so a long session neither
//! grows memory nor blocks the child on a full pipe.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    sync::oneshot,
    task::JoinHandle,
};
use tracing::{debug, info};

const READ_CHUNK: usize = 8 * 1024;

/// A boxed output stream of the child process.
pub type OutputStream = Box<dyn AsyncRead + Send + Unpin>;

/// How the readiness signal was settled. Exactly one of these is ever recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The sentinel was seen.
    Ready,
    /// Every output stream closed before the sentinel.
    Closed,
    /// The waiter gave up.
    TimedOut,
}

/// Why waiting for readiness failed. Carries the output captured so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadinessFailure {
    TimedOut { logs: String },
    Closed { logs: String },
}

impl ReadinessFailure {
    pub fn logs(&self) -> &str {
        match self {
            Self::TimedOut { logs } | Self::Closed { logs } => logs,
        }
    }
}

/// Ordered raw output chunks, shared between the reader tasks and the waiter.
#[derive(Clone, Debug, Default)]
pub struct LogBuffer {
    chunks: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl LogBuffer {
    fn push(&self, chunk: &[u8]) {
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.push(chunk.to_vec());
        }
    }

    fn clear(&self) {
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.clear();
            chunks.shrink_to_fit();
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.lock().map(|chunks| chunks.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenated output, decoded lossily.
    pub fn render(&self) -> String {
        self.chunks
            .lock()
            .map(|chunks| chunks.iter().map(|c| String::from_utf8_lossy(c)).collect())
            .unwrap_or_default()
    }
}

/// One-shot slot that can be settled once; later attempts are no-ops.
#[derive(Debug)]
struct Signal {
    sender: Option<oneshot::Sender<Resolution>>,
    outcome: Option<Resolution>,
}

#[derive(Debug)]
struct Shared {
    sentinel: Vec<u8>,
    display_log: bool,
    logs: LogBuffer,
    signal: Mutex<Signal>,
    ready: AtomicBool,
    open_streams: AtomicUsize,
}

impl Shared {
    /// Records `outcome` if nothing was recorded yet. Returns whether this call won.
    fn resolve(&self, outcome: Resolution) -> bool {
        let Ok(mut signal) = self.signal.lock() else { return false };
        if signal.outcome.is_some() {
            return false;
        }
        signal.outcome = Some(outcome);
        if outcome == Resolution::Ready {
            self.ready.store(true, Ordering::SeqCst);
        }
        if let Some(sender) = signal.sender.take() {
            // The waiter may already be gone; the outcome is recorded either way.
            let _ = sender.send(outcome);
        }
        true
    }

    fn outcome(&self) -> Option<Resolution> {
        self.signal.lock().ok().and_then(|signal| signal.outcome)
    }

    fn matches(&self, window: &[u8]) -> bool {
        !self.sentinel.is_empty() && window.windows(self.sentinel.len()).any(|w| w == self.sentinel)
    }
}

/// Configures which sentinel to look for and whether to echo the output.
#[derive(Clone, Debug)]
pub struct ReadinessDetector {
    sentinel: String,
    display_log: bool,
}

impl ReadinessDetector {
    pub fn new(sentinel: impl Into<String>, display_log: bool) -> Self {
        Self { sentinel: sentinel.into(), display_log }
    }

    /// Starts one reader task per stream and returns the subscription that owns them together
    /// with the signal to wait on. Must be called inside a Tokio runtime.
    pub fn attach(
        &self,
        streams: Vec<(&'static str, OutputStream)>,
    ) -> (LogSubscription, ReadySignal) {
        let (sender, receiver) = oneshot::channel();
        let shared = Arc::new(Shared {
            sentinel: self.sentinel.as_bytes().to_vec(),
            display_log: self.display_log,
            logs: LogBuffer::default(),
            signal: Mutex::new(Signal { sender: Some(sender), outcome: None }),
            ready: AtomicBool::new(false),
            open_streams: AtomicUsize::new(streams.len()),
        });

        let tasks = streams
            .into_iter()
            .map(|(source, reader)| tokio::spawn(pump(reader, source, shared.clone())))
            .collect();

        let subscription = LogSubscription { tasks, shared: shared.clone() };
        let signal = ReadySignal { receiver, shared };
        (subscription, signal)
    }
}

async fn pump(mut reader: OutputStream, source: &'static str, shared: Arc<Shared>) {
    let mut buf = vec![0u8; READ_CHUNK];
    // Tail of the previous chunk so a sentinel split across two reads still matches.
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        let chunk = &buf[..n];

        if shared.display_log {
            let text = String::from_utf8_lossy(chunk);
            for line in text.lines().filter(|line| !line.is_empty()) {
                info!(target: "sealkit_node::output", source, "{line}");
            }
        }

        if shared.ready.load(Ordering::SeqCst) {
            continue;
        }

        shared.logs.push(chunk);

        let mut window = std::mem::take(&mut carry);
        window.extend_from_slice(chunk);
        if shared.matches(&window) {
            if shared.resolve(Resolution::Ready) && !shared.display_log {
                shared.logs.clear();
            }
            continue;
        }

        let keep = shared.sentinel.len().saturating_sub(1).min(window.len());
        carry = window.split_off(window.len() - keep);
    }

    debug!(source, "node output stream closed");
    if shared.open_streams.fetch_sub(1, Ordering::SeqCst) == 1 {
        shared.resolve(Resolution::Closed);
    }
}

/// Owns the reader tasks attached to a process's output. Dropping it detaches them.
#[derive(Debug)]
pub struct LogSubscription {
    tasks: Vec<JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl LogSubscription {
    /// Output buffered so far. Empty after readiness unless verbose logging is on.
    pub fn logs(&self) -> String {
        self.shared.logs.render()
    }

    pub fn outcome(&self) -> Option<Resolution> {
        self.shared.outcome()
    }

    /// Stops the reader tasks.
    pub fn close(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

/// Resolves once: ready, closed, or timed out.
#[derive(Debug)]
pub struct ReadySignal {
    receiver: oneshot::Receiver<Resolution>,
    shared: Arc<Shared>,
}

impl ReadySignal {
    /// Waits for the sentinel for at most `timeout`.
    ///
    /// On timeout the signal is settled as [`Resolution::TimedOut`] before returning, so a
    /// sentinel that arrives afterwards cannot flip it to ready.
    pub async fn wait(mut self, timeout: Duration) -> Result<(), ReadinessFailure> {
        let outcome = match tokio::time::timeout(timeout, &mut self.receiver).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Resolution::Closed,
            Err(_elapsed) => {
                if self.shared.resolve(Resolution::TimedOut) {
                    Resolution::TimedOut
                } else {
                    // A stream settled it in the same instant.
                    self.receiver.try_recv().unwrap_or(Resolution::TimedOut)
                }
            }
        };

        let logs = self.shared.logs.render();
        match outcome {
            Resolution::Ready => Ok(()),
            Resolution::Closed => Err(ReadinessFailure::Closed { logs }),
            Resolution::TimedOut => Err(ReadinessFailure::TimedOut { logs }),
        }
    }
}
