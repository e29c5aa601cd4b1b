//! Callback-driven wait: timer expiry posts into the queue.

use super::{DeadlineWait, WaitOutcome};
use crate::core::error::{BenchError, BenchResult, DequeueError};
use crate::platform::PlatformTimer;
use crate::timing::queue::{SharedQueue, TIMER_KEY};
use std::time::Duration;
use tracing::{debug, error};

/// Arms a reusable one-shot timer and blocks on the queue until the timer's
/// sentinel arrives.
///
/// The timer is created on the first wait and released when this value is
/// dropped.
pub struct DispatchWait {
    queue: SharedQueue,
    timer: Option<PlatformTimer>,
}

impl DispatchWait {
    pub fn new(queue: SharedQueue) -> Self {
        Self { queue, timer: None }
    }

    fn arm(&mut self, delay: Duration) -> BenchResult {
        if self.timer.is_none() {
            debug!("creating dispatch timer");
            self.timer = Some(PlatformTimer::new(SharedQueue::clone(&self.queue), TIMER_KEY)?);
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.arm(delay)?;
        }
        Ok(())
    }

    fn event_loop(&self) -> BenchResult<WaitOutcome> {
        loop {
            match self.queue.dequeue(None) {
                Ok(TIMER_KEY) => return Ok(WaitOutcome::Fired),
                Ok(key) => {
                    error!("Unexpected key {key:#x}");
                    return Err(BenchError::UnexpectedKey { key });
                }
                Err(DequeueError::TimedOut) => continue,
                Err(DequeueError::Failed(e)) => {
                    error!("dispatch wait failed: {e}");
                    return Ok(WaitOutcome::Abandoned);
                }
            }
        }
    }
}

impl DeadlineWait for DispatchWait {
    fn label(&self) -> &'static str {
        "Dispatch style"
    }

    fn wait(&mut self, delay: Duration) -> BenchResult<WaitOutcome> {
        self.arm(delay)?;
        self.event_loop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::queue::shared_queue;
    use std::time::Instant;

    #[test]
    fn timer_is_created_lazily() {
        let wait = DispatchWait::new(shared_queue().unwrap());
        assert!(wait.timer.is_none());
    }

    #[test]
    fn wait_returns_after_delay_and_reuses_timer() {
        let mut wait = DispatchWait::new(shared_queue().unwrap());
        for _ in 0..3 {
            let start = Instant::now();
            assert_eq!(wait.wait(Duration::from_millis(5)).unwrap(), WaitOutcome::Fired);
            assert!(start.elapsed() >= Duration::from_millis(4));
            assert!(wait.timer.is_some());
        }
    }

    #[test]
    fn foreign_key_is_a_protocol_violation() {
        let queue = shared_queue().unwrap();
        queue.post(0x1234).unwrap();
        let mut wait = DispatchWait::new(queue);
        let err = wait.wait(Duration::from_millis(5)).unwrap_err();
        assert!(matches!(err, BenchError::UnexpectedKey { key: 0x1234 }));
    }
}
