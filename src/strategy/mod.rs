//! Deadline-wait strategies under comparison.
//!
//! - [`DispatchWait`]: a one-shot OS timer posts a sentinel into the queue
//!   and the caller blocks on the queue with no timeout.
//! - [`PollWait`]: the caller polls the monotonic clock and blocks on the
//!   queue with a timeout recomputed from the time left, optionally raising
//!   the timer resolution near the deadline.

pub mod dispatch;
pub mod poll;

pub use dispatch::DispatchWait;
pub use poll::{PollMode, PollWait};

use crate::core::error::BenchResult;
use std::time::Duration;

/// How a single wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The deadline was reached.
    Fired,
    /// The wait primitive failed and the wait was given up early.
    Abandoned,
}

/// A way of blocking the calling thread until `delay` has elapsed.
pub trait DeadlineWait {
    /// Heading used in the results report.
    fn label(&self) -> &'static str;

    fn wait(&mut self, delay: Duration) -> BenchResult<WaitOutcome>;
}
