//! Poll-driven adaptive wait.
//!
//! The wait computes an absolute wake instant on the 100 ns monotonic clock,
//! then repeatedly blocks on the notification queue with a timeout equal to
//! the whole milliseconds left. Timeouts and stray notifications both just
//! trigger another pass; a genuine dequeue failure abandons the wait.

use super::{DeadlineWait, WaitOutcome};
use crate::core::error::{BenchResult, DequeueError};
use crate::platform::{interrupt_time_100ns, PlatformResolution, UNITS_PER_MS};
use crate::timing::queue::SharedQueue;
use crate::timing::resolution::ResolutionControl;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, trace, warn};

/// Below this many milliseconds left, adaptive mode raises the timer resolution.
pub const HIGH_RES_THRESHOLD_MS: u64 = 100;

/// One default scheduler tick, rounded down.
pub const TICK_ALLOWANCE_MS: u64 = 15;

/// How the poll loop shapes its timeouts and the timer resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollMode {
    /// Request elevated resolution while less than [`HIGH_RES_THRESHOLD_MS`]
    /// remain, release it otherwise.
    #[default]
    Adaptive,
    /// Never touch the resolution; wake a tick early and spin the rest.
    SpinTail,
    /// Never touch the resolution per call; the caller holds it for the whole run.
    GlobalHighRes,
}

/// Per-call wait state. Lives on the stack of a single `wait`.
#[derive(Debug)]
struct PollState {
    /// Absolute wake instant; `None` once the deadline has fired.
    wake_at: Option<u64>,
    hi_res: bool,
    /// Set after a refused resolution request so the call stops asking.
    hi_res_refused: bool,
}

impl PollState {
    fn arm(now: u64, delay: Duration) -> Self {
        let units = (delay.as_nanos() / 100).min(u64::MAX as u128) as u64;
        Self {
            wake_at: Some(now.saturating_add(units)),
            hi_res: false,
            hi_res_refused: false,
        }
    }
}

/// Poll-driven deadline wait.
pub struct PollWait<R: ResolutionControl = PlatformResolution> {
    queue: SharedQueue,
    resolution: R,
    mode: PollMode,
}

impl PollWait<PlatformResolution> {
    pub fn new(queue: SharedQueue, mode: PollMode) -> Self {
        Self::with_resolution(queue, mode, PlatformResolution::new())
    }
}

impl<R: ResolutionControl> PollWait<R> {
    pub fn with_resolution(queue: SharedQueue, mode: PollMode, resolution: R) -> Self {
        Self {
            queue,
            resolution,
            mode,
        }
    }

    pub fn mode(&self) -> PollMode {
        self.mode
    }

    pub fn resolution(&self) -> &R {
        &self.resolution
    }

    /// Dequeue timeout for this pass, adjusting the resolution in adaptive mode.
    fn next_timeout(&mut self, remaining_ms: u64, state: &mut PollState) -> Duration {
        match self.mode {
            PollMode::Adaptive => {
                let wants_hi_res = remaining_ms < HIGH_RES_THRESHOLD_MS;
                if wants_hi_res && !state.hi_res && !state.hi_res_refused {
                    match self.resolution.begin() {
                        Ok(()) => state.hi_res = true,
                        Err(e) => {
                            warn!("elevated timer resolution unavailable: {e}");
                            state.hi_res_refused = true;
                        }
                    }
                } else if !wants_hi_res && state.hi_res {
                    self.resolution.end();
                    state.hi_res = false;
                }
                Duration::from_millis(remaining_ms)
            }
            PollMode::SpinTail => {
                Duration::from_millis(remaining_ms.saturating_sub(TICK_ALLOWANCE_MS))
            }
            PollMode::GlobalHighRes => Duration::from_millis(remaining_ms),
        }
    }

    fn event_loop(&mut self, state: &mut PollState) -> WaitOutcome {
        loop {
            let Some(wake_at) = state.wake_at else {
                return WaitOutcome::Fired;
            };
            let now = interrupt_time_100ns();
            if now >= wake_at {
                state.wake_at = None;
                return WaitOutcome::Fired;
            }
            let remaining_ms = (wake_at - now) / UNITS_PER_MS;
            let timeout = self.next_timeout(remaining_ms, state);

            match self.queue.dequeue(Some(timeout)) {
                Ok(key) => trace!("ignoring notification {key:#x} while polling"),
                Err(DequeueError::TimedOut) => {}
                Err(DequeueError::Failed(e)) => {
                    error!("Error {e}");
                    return WaitOutcome::Abandoned;
                }
            }
        }
    }
}

impl<R: ResolutionControl> DeadlineWait for PollWait<R> {
    fn label(&self) -> &'static str {
        "New style"
    }

    fn wait(&mut self, delay: Duration) -> BenchResult<WaitOutcome> {
        let mut state = PollState::arm(interrupt_time_100ns(), delay);
        let outcome = self.event_loop(&mut state);
        if state.hi_res {
            self.resolution.end();
        }
        Ok(outcome)
    }
}
