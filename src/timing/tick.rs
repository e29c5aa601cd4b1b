//! Tick alignment.

use crate::platform::coarse_tick;

/// Spin until the coarse uptime counter changes.
///
/// Busy-polls on purpose: a blocking wait would add its own wake-up latency
/// and land somewhere after the tick boundary instead of on it.
pub fn wait_for_tick() {
    let current = coarse_tick();
    while coarse_tick() == current {
        std::hint::spin_loop();
    }
}
