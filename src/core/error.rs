//! Error types for the sleep latency benchmark.

use std::io;
use thiserror::Error;

/// Exit code for any fatal error other than a protocol violation.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when the dispatch-style wait dequeues a notification it does not own.
pub const EXIT_PROTOCOL_VIOLATION: i32 = 2;

/// Errors that abort a benchmark run
#[derive(Debug, Error)]
pub enum BenchError {
    /// A notification with a foreign key reached the dispatch-style wait loop.
    #[error("unexpected completion key {key:#x}")]
    UnexpectedKey { key: usize },

    /// An OS timing primitive could not be created or armed.
    #[error("{call} failed: {source}")]
    Platform {
        call: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// Wrap the calling thread's last OS error.
    pub fn last_os_error(call: &'static str) -> Self {
        BenchError::Platform {
            call,
            source: io::Error::last_os_error(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::UnexpectedKey { .. } => EXIT_PROTOCOL_VIOLATION,
            _ => EXIT_FAILURE,
        }
    }
}

/// Why a blocking dequeue returned without a notification.
#[derive(Debug, Error)]
pub enum DequeueError {
    /// The timeout elapsed with nothing posted. Expected control flow for polling waits.
    #[error("dequeue timed out")]
    TimedOut,

    #[error("dequeue failed: {0}")]
    Failed(#[source] io::Error),
}

pub type BenchResult<T = ()> = Result<T, BenchError>;
