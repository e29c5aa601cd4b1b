//! Poll-driven wait: no early wake, resolution symmetry, abandonment.

use sleep_latency_bench::strategy::{DeadlineWait, PollMode, PollWait, WaitOutcome};
use sleep_latency_bench::timing::{
    measure_duration, shared_queue, NotificationQueue, ResolutionControl, SharedQueue,
};
use sleep_latency_bench::{BenchResult, DequeueError};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct CountingResolution {
    begins: usize,
    ends: usize,
    active: bool,
}

impl ResolutionControl for CountingResolution {
    fn begin(&mut self) -> BenchResult {
        self.begins += 1;
        self.active = true;
        Ok(())
    }

    fn end(&mut self) {
        self.ends += 1;
        self.active = false;
    }
}

/// Platform queue whose next dequeue can be made to fail once.
struct FlakyQueue {
    inner: SharedQueue,
    fail_next: AtomicBool,
    dequeues: AtomicUsize,
}

impl NotificationQueue for FlakyQueue {
    fn post(&self, key: usize) -> BenchResult {
        self.inner.post(key)
    }

    fn dequeue(&self, timeout: Option<Duration>) -> Result<usize, DequeueError> {
        self.dequeues.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DequeueError::Failed(io::Error::new(
                io::ErrorKind::Other,
                "injected failure",
            )));
        }
        self.inner.dequeue(timeout)
    }
}

#[test]
fn one_ms_delay_never_wakes_early() {
    let mut poll = PollWait::with_resolution(
        shared_queue().unwrap(),
        PollMode::Adaptive,
        CountingResolution::default(),
    );
    let delay = Duration::from_millis(1);

    let mut samples = Vec::new();
    let summary = measure_duration(10, || {
        let start = Instant::now();
        assert_eq!(poll.wait(delay)?, WaitOutcome::Fired);
        samples.push(start.elapsed());
        Ok(())
    })
    .unwrap();

    assert_eq!(samples.len(), 10);
    assert!(samples.iter().all(|s| *s >= delay));
    assert!(summary.minimum() >= delay);

    let res = poll.resolution();
    assert!(res.begins >= 1);
    assert_eq!(res.begins, res.ends);
    assert!(!res.active);
}

#[test]
fn every_mode_respects_the_deadline() {
    for mode in [PollMode::Adaptive, PollMode::SpinTail, PollMode::GlobalHighRes] {
        let mut poll =
            PollWait::with_resolution(shared_queue().unwrap(), mode, CountingResolution::default());
        for ms in [1u64, 9, 17] {
            let delay = Duration::from_millis(ms);
            let start = Instant::now();
            assert_eq!(poll.wait(delay).unwrap(), WaitOutcome::Fired);
            assert!(start.elapsed() >= delay, "{mode:?} woke early for {ms} ms");
        }
        assert!(!poll.resolution().active);
    }
}

#[test]
fn injected_failure_shortens_the_repetition() {
    let queue = Arc::new(FlakyQueue {
        inner: shared_queue().unwrap(),
        fail_next: AtomicBool::new(true),
        dequeues: AtomicUsize::new(0),
    });
    let mut poll = PollWait::with_resolution(
        queue.clone() as SharedQueue,
        PollMode::Adaptive,
        CountingResolution::default(),
    );
    let delay = Duration::from_millis(80);

    let start = Instant::now();
    let outcome = poll.wait(delay).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(outcome, WaitOutcome::Abandoned);
    assert!(elapsed < delay);
    assert_eq!(queue.dequeues.load(Ordering::SeqCst), 1);
    assert!(!poll.resolution().active);
    assert_eq!(poll.resolution().begins, poll.resolution().ends);

    // The next call is unaffected.
    let start = Instant::now();
    assert_eq!(poll.wait(Duration::from_millis(5)).unwrap(), WaitOutcome::Fired);
    assert!(start.elapsed() >= Duration::from_millis(5));
    assert!(!poll.resolution().active);
}

#[test]
fn platform_resolution_is_released_after_each_wait() {
    let mut poll = PollWait::new(shared_queue().unwrap(), PollMode::Adaptive);
    for _ in 0..3 {
        let start = Instant::now();
        assert_eq!(poll.wait(Duration::from_millis(2)).unwrap(), WaitOutcome::Fired);
        assert!(start.elapsed() >= Duration::from_millis(2));
    }
}
