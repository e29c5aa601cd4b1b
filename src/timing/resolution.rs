//! Elevated timer resolution control.

use crate::core::error::BenchResult;

/// Process- or thread-wide request for finer OS wait granularity.
///
/// Every successful `begin` must be paired with exactly one `end`.
pub trait ResolutionControl {
    fn begin(&mut self) -> BenchResult;
    fn end(&mut self);
}

impl<R: ResolutionControl + ?Sized> ResolutionControl for &mut R {
    fn begin(&mut self) -> BenchResult {
        (**self).begin()
    }

    fn end(&mut self) {
        (**self).end()
    }
}

/// Holds elevated resolution for its whole lifetime.
pub struct ResolutionGuard<R: ResolutionControl> {
    control: R,
}

impl<R: ResolutionControl> ResolutionGuard<R> {
    pub fn acquire(mut control: R) -> BenchResult<Self> {
        control.begin()?;
        Ok(Self { control })
    }
}

impl<R: ResolutionControl> Drop for ResolutionGuard<R> {
    fn drop(&mut self) {
        self.control.end();
    }
}
