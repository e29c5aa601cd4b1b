//! Timing samples and their min/max/total summary.

use std::time::Duration;

/// One measured elapsed duration for a single repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimingSample(Duration);

impl TimingSample {
    pub fn new(elapsed: Duration) -> Self {
        Self(elapsed)
    }

    pub fn elapsed(&self) -> Duration {
        self.0
    }

    pub fn as_millis_f64(&self) -> f64 {
        self.0.as_secs_f64() * 1000.0
    }
}

/// Running total, minimum and maximum over a fixed number of samples.
///
/// Built only by [`SummaryBuilder::finish`], so a summary never exposes a
/// partially recorded run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingSummary {
    total: Duration,
    minimum: Duration,
    maximum: Duration,
    count: u32,
}

impl TimingSummary {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn minimum(&self) -> Duration {
        self.minimum
    }

    pub fn maximum(&self) -> Duration {
        self.maximum
    }

    /// Mean sample in fractional milliseconds; 0 for an empty summary.
    pub fn average_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        to_ms(self.total) / self.count as f64
    }

    pub fn minimum_ms(&self) -> f64 {
        to_ms(self.minimum)
    }

    pub fn maximum_ms(&self) -> f64 {
        to_ms(self.maximum)
    }

    /// Average lateness relative to the requested delay.
    pub fn overshoot_ms(&self, target: Duration) -> f64 {
        self.average_ms() - to_ms(target)
    }
}

fn to_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Accumulates samples for one (strategy, delay) pair.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    summary: TimingSummary,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: TimingSample) {
        let elapsed = sample.elapsed();
        let s = &mut self.summary;
        if s.count == 0 {
            s.minimum = elapsed;
            s.maximum = elapsed;
        } else {
            s.minimum = s.minimum.min(elapsed);
            s.maximum = s.maximum.max(elapsed);
        }
        s.total += elapsed;
        s.count += 1;
    }

    pub fn finish(self) -> TimingSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> TimingSample {
        TimingSample::new(Duration::from_millis(v))
    }

    #[test]
    fn first_sample_sets_both_bounds() {
        let mut b = SummaryBuilder::new();
        b.record(ms(7));
        let s = b.finish();
        assert_eq!(s.minimum(), Duration::from_millis(7));
        assert_eq!(s.maximum(), Duration::from_millis(7));
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn tracks_min_max_and_average() {
        let mut b = SummaryBuilder::new();
        for v in [16, 15, 31, 17] {
            b.record(ms(v));
        }
        let s = b.finish();
        assert_eq!(s.minimum_ms(), 15.0);
        assert_eq!(s.maximum_ms(), 31.0);
        assert_eq!(s.total(), Duration::from_millis(79));
        assert!((s.average_ms() - 19.75).abs() < 1e-9);
        assert!((s.overshoot_ms(Duration::from_millis(15)) - 4.75).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let s = SummaryBuilder::new().finish();
        assert_eq!(s, TimingSummary::default());
        assert_eq!(s.average_ms(), 0.0);
    }

    #[test]
    fn sample_reports_fractional_millis() {
        let sample = TimingSample::new(Duration::from_micros(1_500));
        assert!((sample.as_millis_f64() - 1.5).abs() < 1e-12);
    }
}
