//! Linux implementation: coarse/monotonic clocks and per-thread timer slack.

use crate::core::error::{BenchError, BenchResult};
use crate::timing::resolution::ResolutionControl;
use libc::{clock_gettime, prctl, timespec, CLOCK_MONOTONIC, CLOCK_MONOTONIC_COARSE};
use libc::{PR_GET_TIMERSLACK, PR_SET_TIMERSLACK};

fn read_clock(clock: libc::clockid_t) -> timespec {
    let mut ts: timespec = unsafe { std::mem::zeroed() };
    unsafe {
        clock_gettime(clock, &mut ts);
    }
    ts
}

/// Jiffy-granular monotonic clock in nanoseconds. Only changes on a tick.
pub fn coarse_tick() -> u64 {
    let ts = read_clock(CLOCK_MONOTONIC_COARSE);
    ts.tv_sec as u64 * 1_000_000_000 + ts.tv_nsec as u64
}

pub fn interrupt_time_100ns() -> u64 {
    let ts = read_clock(CLOCK_MONOTONIC);
    ts.tv_sec as u64 * 10_000_000 + ts.tv_nsec as u64 / 100
}

/// Lowers the calling thread's timer slack to 1 ns and restores the
/// previous value on release.
#[derive(Debug, Default)]
pub struct PlatformResolution {
    saved_slack: Option<libc::c_ulong>,
}

impl PlatformResolution {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolutionControl for PlatformResolution {
    fn begin(&mut self) -> BenchResult {
        let previous = unsafe { prctl(PR_GET_TIMERSLACK, 0, 0, 0, 0) };
        if previous < 0 {
            return Err(BenchError::last_os_error("prctl(PR_GET_TIMERSLACK)"));
        }
        if unsafe { prctl(PR_SET_TIMERSLACK, 1 as libc::c_ulong, 0, 0, 0) } != 0 {
            return Err(BenchError::last_os_error("prctl(PR_SET_TIMERSLACK)"));
        }
        self.saved_slack = Some(previous as libc::c_ulong);
        Ok(())
    }

    fn end(&mut self) {
        if let Some(slack) = self.saved_slack.take() {
            unsafe {
                prctl(PR_SET_TIMERSLACK, slack, 0, 0, 0);
            }
        }
    }
}
