//! Channel-backed notification queue and runtime-backed one-shot timer for
//! platforms without completion ports.

use crate::core::error::{BenchError, BenchResult, DequeueError};
use crate::timing::queue::{NotificationQueue, SharedQueue};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::io;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

/// Unbounded MPSC channel. The queue keeps its own sender alive, so the
/// receiving side only ever reports timeouts.
pub struct PlatformQueue {
    tx: Sender<usize>,
    rx: Receiver<usize>,
}

impl PlatformQueue {
    pub fn new() -> BenchResult<Self> {
        let (tx, rx) = channel::unbounded();
        Ok(Self { tx, rx })
    }
}

impl NotificationQueue for PlatformQueue {
    fn post(&self, key: usize) -> BenchResult {
        self.tx.send(key).map_err(|_| BenchError::Platform {
            call: "channel send",
            source: io::Error::new(io::ErrorKind::BrokenPipe, "notification queue closed"),
        })
    }

    fn dequeue(&self, timeout: Option<Duration>) -> Result<usize, DequeueError> {
        match timeout {
            None => self.rx.recv().map_err(|_| {
                DequeueError::Failed(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "notification queue closed",
                ))
            }),
            Some(t) => self.rx.recv_timeout(t).map_err(|e| match e {
                RecvTimeoutError::Timeout => DequeueError::TimedOut,
                RecvTimeoutError::Disconnected => DequeueError::Failed(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "notification queue closed",
                )),
            }),
        }
    }
}

/// One-shot timer driven by a single-worker tokio runtime. Expiry runs on the
/// runtime's worker thread and posts `key` into `queue`.
pub struct PlatformTimer {
    runtime: Runtime,
    queue: SharedQueue,
    key: usize,
    pending: Option<JoinHandle<()>>,
}

impl PlatformTimer {
    pub fn new(queue: SharedQueue, key: usize) -> BenchResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("timer-callback")
            .enable_time()
            .build()
            .map_err(|source| BenchError::Platform {
                call: "tokio runtime",
                source,
            })?;
        Ok(Self {
            runtime,
            queue,
            key,
            pending: None,
        })
    }

    /// Re-arm for a single expiry `delay` from now, replacing any pending one.
    pub fn arm(&mut self, delay: Duration) -> BenchResult {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        let due = tokio::time::Instant::now() + delay;
        let queue = SharedQueue::clone(&self.queue);
        let key = self.key;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep_until(due).await;
            if let Err(e) = queue.post(key) {
                tracing::error!("timer callback could not post: {e}");
            }
        }));
        Ok(())
    }
}

impl Drop for PlatformTimer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
