//! # Scheduler Errors
//!
//! Errors returned synchronously to callers of the [`SchedulerHandle`](crate::SchedulerHandle).
//! Failures *inside* a task never surface here; they are reported through the task's
//! [`TaskOutcome`](crate::TaskOutcome) and the logs.

/// Errors that can occur when handing work to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("Scheduler stopped")]
    Stopped,
    #[error("Submission queue full (capacity {0})")]
    QueueFull(usize),
}

/// Returned by [`TaskContext::sleep`](crate::TaskContext::sleep) when the scheduler
/// was stopped while the task was suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Task cancelled")]
pub struct Cancelled;

/// Errors from [`setup_tracing`](crate::tracing::setup_tracing).
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Log file path {0:?} has no file name")]
    InvalidLogFile(std::path::PathBuf),
    #[error("Cannot open log file: {0}")]
    LogFile(#[from] tracing_appender::rolling::InitError),
    #[error("Tracing already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}
