//! Repetition harness.

use crate::core::error::BenchResult;
use crate::stats::{SummaryBuilder, TimingSample, TimingSummary};
use crate::strategy::{DeadlineWait, WaitOutcome};
use crate::timing::queue::SharedQueue;
use crate::timing::tick::wait_for_tick;
use std::time::{Duration, Instant};
use tracing::debug;

/// Run `body` `count` times, each aligned to a fresh tick and timed with the
/// monotonic clock.
///
/// An error from `body` aborts the run immediately; samples recorded so far
/// are discarded along with it.
pub fn measure_duration<F>(count: u32, mut body: F) -> BenchResult<TimingSummary>
where
    F: FnMut() -> BenchResult,
{
    let mut builder = SummaryBuilder::new();
    for _ in 0..count {
        wait_for_tick();
        let last = Instant::now();
        body()?;
        let elapsed = last.elapsed();
        builder.record(TimingSample::new(elapsed));
    }
    Ok(builder.finish())
}

/// Owns the notification queue for the duration of a run and drives
/// strategies through it one repetition at a time.
pub struct Harness {
    queue: SharedQueue,
    repetitions: u32,
}

impl Harness {
    pub fn new(queue: SharedQueue, repetitions: u32) -> Self {
        Self { queue, repetitions }
    }

    /// The queue strategies must be built with.
    pub fn queue(&self) -> SharedQueue {
        SharedQueue::clone(&self.queue)
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    /// Measure one strategy at one target delay.
    pub fn run(&self, strategy: &mut dyn DeadlineWait, delay: Duration) -> BenchResult<TimingSummary> {
        let label = strategy.label();
        let summary = measure_duration(self.repetitions, || {
            if let WaitOutcome::Abandoned = strategy.wait(delay)? {
                debug!(strategy = label, ?delay, "repetition ended before its deadline");
            }
            Ok(())
        })?;
        debug!(
            strategy = label,
            ?delay,
            avg_ms = summary.average_ms(),
            min_ms = summary.minimum_ms(),
            max_ms = summary.maximum_ms(),
            "measured"
        );
        Ok(summary)
    }
}
