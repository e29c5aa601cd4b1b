//! Notification queue shared by both deadline-wait strategies.
//!
//! The harness owns a single queue for the whole run and hands clones of the
//! [`SharedQueue`] to each strategy. Only one strategy waits on it at a time.

use crate::core::error::{BenchResult, DequeueError};
use std::sync::Arc;
use std::time::Duration;

/// Completion key posted by the dispatch-style timer callback.
pub const TIMER_KEY: usize = 0xdead_beef;

/// Thread-safe rendezvous carrying opaque completion keys.
pub trait NotificationQueue: Send + Sync {
    /// Post a key. Safe to call from any thread, including OS timer callbacks.
    fn post(&self, key: usize) -> BenchResult;

    /// Block until a key arrives. `None` waits forever.
    fn dequeue(&self, timeout: Option<Duration>) -> Result<usize, DequeueError>;
}

pub type SharedQueue = Arc<dyn NotificationQueue>;

/// Create the platform queue used for a benchmark run.
pub fn shared_queue() -> BenchResult<SharedQueue> {
    Ok(Arc::new(crate::platform::PlatformQueue::new()?))
}
