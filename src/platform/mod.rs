//! Per-OS timing primitives.
//!
//! Every platform exposes the same surface:
//!
//! - `coarse_tick()`: the low-resolution uptime counter used for tick alignment
//! - `interrupt_time_100ns()`: a monotonic clock in 100 ns units
//! - `PlatformResolution`: elevated timer granularity request/release
//! - `PlatformQueue`: the notification queue
//! - `PlatformTimer`: a reusable one-shot timer that posts into a queue

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use self::windows::{
    coarse_tick, interrupt_time_100ns, PlatformQueue, PlatformResolution, PlatformTimer,
};

#[cfg(not(target_os = "windows"))]
mod portable;
#[cfg(not(target_os = "windows"))]
pub use self::portable::{PlatformQueue, PlatformTimer};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use self::linux::{coarse_tick, interrupt_time_100ns, PlatformResolution};

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
mod fallback;
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub use self::fallback::{coarse_tick, interrupt_time_100ns, PlatformResolution};

/// 100 ns clock units per millisecond.
pub const UNITS_PER_MS: u64 = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_time_is_monotonic() {
        let a = interrupt_time_100ns();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = interrupt_time_100ns();
        assert!(b > a);
        assert!(b - a >= 2 * UNITS_PER_MS);
    }

    #[test]
    fn coarse_tick_eventually_advances() {
        let start = coarse_tick();
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_ne!(coarse_tick(), start);
    }
}
