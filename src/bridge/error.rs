//! Error types for the inbound bridge.

use relay_runtime::SchedulerError;
use thiserror::Error;

/// Why an inbound message did not become a scheduled job.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// The payload is not valid UTF-8.
    #[error("Failed to decode payload: {0}")]
    DecodeError(#[from] std::str::Utf8Error),

    /// The scheduler refused the job (stopped, or its queue is full).
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
