pub mod timing_summary;

pub use timing_summary::{SummaryBuilder, TimingSample, TimingSummary};
