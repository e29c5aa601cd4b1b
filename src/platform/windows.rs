//! Windows implementation: winmm tick and resolution, I/O completion port,
//! thread-pool timer.

use crate::core::error::{BenchError, BenchResult, DequeueError};
use crate::timing::queue::SharedQueue;
use crate::timing::resolution::ResolutionControl;
use std::ffi::c_void;
use std::io;
use std::ptr;
use std::time::Duration;
use windows_sys::Win32::Foundation::{CloseHandle, FILETIME, HANDLE, INVALID_HANDLE_VALUE, WAIT_TIMEOUT};
use windows_sys::Win32::Media::{timeBeginPeriod, timeEndPeriod, timeGetTime, TIMERR_NOERROR};
use windows_sys::Win32::System::IO::{
    CreateIoCompletionPort, GetQueuedCompletionStatus, PostQueuedCompletionStatus, OVERLAPPED,
};
use windows_sys::Win32::System::Threading::{
    CloseThreadpoolTimer, CreateThreadpoolTimer, SetThreadpoolTimer,
    WaitForThreadpoolTimerCallbacks, INFINITE, PTP_CALLBACK_INSTANCE, PTP_TIMER,
};
use windows_sys::Win32::System::WindowsProgramming::QueryInterruptTimePrecise;

/// Millisecond uptime counter; advances once per scheduler tick unless the
/// system timer resolution has been raised.
pub fn coarse_tick() -> u64 {
    unsafe { timeGetTime() as u64 }
}

pub fn interrupt_time_100ns() -> u64 {
    let mut now = 0u64;
    unsafe { QueryInterruptTimePrecise(&mut now) };
    now
}

/// `timeBeginPeriod(1)` / `timeEndPeriod(1)`.
#[derive(Debug, Default)]
pub struct PlatformResolution {
    active: bool,
}

impl PlatformResolution {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolutionControl for PlatformResolution {
    fn begin(&mut self) -> BenchResult {
        if unsafe { timeBeginPeriod(1) } != TIMERR_NOERROR {
            return Err(BenchError::Platform {
                call: "timeBeginPeriod",
                source: io::Error::new(io::ErrorKind::Unsupported, "period 1 ms rejected"),
            });
        }
        self.active = true;
        Ok(())
    }

    fn end(&mut self) {
        if self.active {
            unsafe { timeEndPeriod(1) };
            self.active = false;
        }
    }
}

/// I/O completion port with a concurrency of one.
pub struct PlatformQueue {
    port: HANDLE,
}

// Completion ports are safe to post to and wait on from any thread.
unsafe impl Send for PlatformQueue {}
unsafe impl Sync for PlatformQueue {}

impl PlatformQueue {
    pub fn new() -> BenchResult<Self> {
        let port = unsafe { CreateIoCompletionPort(INVALID_HANDLE_VALUE, ptr::null_mut(), 0, 1) };
        if port.is_null() {
            return Err(BenchError::last_os_error("CreateIoCompletionPort"));
        }
        Ok(Self { port })
    }
}

impl crate::timing::queue::NotificationQueue for PlatformQueue {
    fn post(&self, key: usize) -> BenchResult {
        if unsafe { PostQueuedCompletionStatus(self.port, 0, key, ptr::null()) } == 0 {
            return Err(BenchError::last_os_error("PostQueuedCompletionStatus"));
        }
        Ok(())
    }

    fn dequeue(&self, timeout: Option<Duration>) -> Result<usize, DequeueError> {
        let millis = match timeout {
            Some(t) => t.as_millis().min(INFINITE as u128 - 1) as u32,
            None => INFINITE,
        };
        let mut bytes = 0u32;
        let mut key = 0usize;
        let mut overlapped: *mut OVERLAPPED = ptr::null_mut();
        let ok = unsafe {
            GetQueuedCompletionStatus(self.port, &mut bytes, &mut key, &mut overlapped, millis)
        };
        if ok != 0 {
            return Ok(key);
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(WAIT_TIMEOUT as i32) {
            Err(DequeueError::TimedOut)
        } else {
            Err(DequeueError::Failed(err))
        }
    }
}

impl Drop for PlatformQueue {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.port);
        }
    }
}

struct TimerContext {
    queue: SharedQueue,
    key: usize,
}

unsafe extern "system" fn timer_callback(
    _instance: PTP_CALLBACK_INSTANCE,
    context: *mut c_void,
    _timer: PTP_TIMER,
) {
    // SAFETY: `context` is the boxed TimerContext owned by the PlatformTimer,
    // which waits for outstanding callbacks before freeing it.
    let ctx = unsafe { &*(context as *const TimerContext) };
    let _ = ctx.queue.post(ctx.key);
}

/// Thread-pool timer whose expiry callback posts `key` into `queue`.
pub struct PlatformTimer {
    timer: PTP_TIMER,
    context: *mut TimerContext,
}

impl PlatformTimer {
    pub fn new(queue: SharedQueue, key: usize) -> BenchResult<Self> {
        let context = Box::into_raw(Box::new(TimerContext { queue, key }));
        let timer =
            unsafe { CreateThreadpoolTimer(Some(timer_callback), context as *mut c_void, ptr::null()) };
        if timer.is_null() {
            let err = BenchError::last_os_error("CreateThreadpoolTimer");
            drop(unsafe { Box::from_raw(context) });
            return Err(err);
        }
        Ok(Self { timer, context })
    }

    /// Re-arm for a single expiry `delay` from now, replacing any pending one.
    pub fn arm(&mut self, delay: Duration) -> BenchResult {
        let due = relative_due_time_100ns(delay);
        let due_time = FILETIME {
            dwLowDateTime: due as u32,
            dwHighDateTime: (due >> 32) as u32,
        };
        unsafe { SetThreadpoolTimer(self.timer, &due_time, 0, 0) };
        Ok(())
    }
}

impl Drop for PlatformTimer {
    fn drop(&mut self) {
        unsafe {
            SetThreadpoolTimer(self.timer, ptr::null(), 0, 0);
            WaitForThreadpoolTimerCallbacks(self.timer, 1);
            CloseThreadpoolTimer(self.timer);
            drop(Box::from_raw(self.context));
        }
    }
}

/// Relative due times are negative multiples of 100 ns.
fn relative_due_time_100ns(delay: Duration) -> i64 {
    let ticks = (delay.as_nanos() / 100).min(i64::MAX as u128) as i64;
    -ticks.max(1)
}
