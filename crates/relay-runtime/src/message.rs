//! # Submissions
//!
//! The message type carried by the submission queue from a
//! [`SchedulerHandle`](crate::SchedulerHandle) to the [`TaskScheduler`](crate::TaskScheduler) loop.

use crate::task::{TaskContext, TaskId, TaskOutcome};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// The future a job produces once the scheduler hands it a [`TaskContext`].
pub type JobFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A unit of work as stored in the queue. Built on the submitting thread, started on the
/// scheduler's.
pub type Job = Box<dyn FnOnce(TaskContext) -> JobFuture + Send + 'static>;

/// One entry in the submission queue.
pub struct Submission {
    pub id: TaskId,
    pub job: Job,
    pub done: oneshot::Sender<TaskOutcome>,
    pub submitted_at: Instant,
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("id", &self.id)
            .field("submitted_at", &self.submitted_at)
            .finish_non_exhaustive()
    }
}
