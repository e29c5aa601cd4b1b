//! Measurement core: tick alignment, the shared notification queue and the
//! repetition harness.

pub mod harness;
pub mod queue;
pub mod resolution;
pub mod tick;

pub use harness::{measure_duration, Harness};
pub use queue::{shared_queue, NotificationQueue, SharedQueue, TIMER_KEY};
pub use resolution::{ResolutionControl, ResolutionGuard};
pub use tick::wait_for_tick;
