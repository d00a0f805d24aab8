//! # Tasks
//!
//! The per-task types shared between the scheduler loop and the code it runs:
//! identifiers, the [`TaskContext`] handed to every job, and the [`TaskHandle`]
//! returned to whoever submitted it.

use crate::error::Cancelled;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Opaque identifier assigned to every submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task_{}", self.0)
    }
}

/// How a task left the scheduler's run-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The job ran to the end without observing cancellation.
    Completed,
    /// The job observed a stop at a suspension point, or never started.
    Cancelled,
    /// The job panicked. Other tasks are unaffected.
    Panicked,
}

/// Handle given to every job when the scheduler starts it.
///
/// The context is the job's only link back to the scheduler. Its [`sleep`](Self::sleep)
/// is the cooperative suspension point: it parks the task on the runtime's timer
/// (never a blocking sleep) and wakes early with [`Cancelled`] once the scheduler
/// is stopped.
#[derive(Debug, Clone)]
pub struct TaskContext {
    id: TaskId,
    cancel: CancellationToken,
    interrupted: Arc<AtomicBool>,
}

impl TaskContext {
    pub fn new(id: TaskId, cancel: CancellationToken) -> Self {
        Self {
            id,
            cancel,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A context that is never cancelled. Handy for running a job outside the scheduler.
    pub fn detached(id: TaskId) -> Self {
        Self::new(id, CancellationToken::new())
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Suspends the task for `duration`.
    ///
    /// Returns `Err(Cancelled)` as soon as the scheduler is stopped; a cancelled task
    /// is expected to return without side effects.
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                self.interrupted.store(true, Ordering::Release);
                Err(Cancelled)
            }
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    pub(crate) fn interrupted(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }
}

/// Returned by [`SchedulerHandle::submit`](crate::SchedulerHandle::submit).
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    outcome: oneshot::Receiver<TaskOutcome>,
}

impl TaskHandle {
    pub(crate) fn new(id: TaskId, outcome: oneshot::Receiver<TaskOutcome>) -> Self {
        Self { id, outcome }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Waits for the task to leave the run-set.
    ///
    /// If the scheduler goes away without reporting, the task never ran to completion
    /// and is reported as cancelled.
    pub async fn join(self) -> TaskOutcome {
        self.outcome.await.unwrap_or(TaskOutcome::Cancelled)
    }
}
