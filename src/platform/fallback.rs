//! Fallback implementation for platforms without a dedicated backend.

use crate::core::error::BenchResult;
use crate::timing::resolution::ResolutionControl;
use std::sync::OnceLock;
use std::time::Instant;

fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// Millisecond counter since first use.
pub fn coarse_tick() -> u64 {
    epoch().elapsed().as_millis() as u64
}

pub fn interrupt_time_100ns() -> u64 {
    (epoch().elapsed().as_nanos() / 100) as u64
}

/// No OS knob to turn; requests are accepted and ignored.
#[derive(Debug, Default)]
pub struct PlatformResolution;

impl PlatformResolution {
    pub fn new() -> Self {
        Self
    }
}

impl ResolutionControl for PlatformResolution {
    fn begin(&mut self) -> BenchResult {
        Ok(())
    }

    fn end(&mut self) {}
}
