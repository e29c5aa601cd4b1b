//! Sleep Latency Benchmark Library
//!
//! Measures how late two "sleep until deadline" strategies wake up on a
//! tick-driven OS: a timer callback posting into a notification queue, and a
//! clock-polling wait with adaptive timer resolution.

pub mod core;
pub mod platform;
pub mod stats;
pub mod strategy;
pub mod timing;
pub mod ui;
pub mod utils;

pub use core::error::{BenchError, BenchResult, DequeueError};
pub use core::run_benchmark;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
