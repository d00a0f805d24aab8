//! # Scheduler Handle
//!
//! The thread-safe half of the scheduler. It is cheap to clone and may be used from any
//! thread, including threads that have no async runtime at all (for example a message-bus
//! client's I/O thread).

use crate::error::SchedulerError;
use crate::message::{JobFuture, Submission};
use crate::task::{TaskContext, TaskHandle, TaskId};
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

/// Submits jobs to a running [`TaskScheduler`](crate::TaskScheduler) and stops it.
///
/// ## Submission
///
/// [`submit`](Self::submit) is synchronous: it reserves a queue slot, pushes the job onto
/// the multi-producer queue and returns a [`TaskHandle`]. It never waits for the scheduler,
/// so it is safe to call from a callback that must not block.
///
/// ## Backpressure
///
/// The queue is unbounded unless the scheduler was built with a capacity, in which case a
/// full queue rejects the new job with [`SchedulerError::QueueFull`]. Existing entries are
/// never dropped to make room.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    sender: mpsc::UnboundedSender<Submission>,
    shutdown: CancellationToken,
    next_id: Arc<AtomicU64>,
    queued: Arc<AtomicUsize>,
    capacity: Option<usize>,
}

impl SchedulerHandle {
    pub(crate) fn new(
        sender: mpsc::UnboundedSender<Submission>,
        shutdown: CancellationToken,
        queued: Arc<AtomicUsize>,
        capacity: Option<usize>,
    ) -> Self {
        Self {
            sender,
            shutdown,
            next_id: Arc::new(AtomicU64::new(1)),
            queued,
            capacity,
        }
    }

    /// Enqueues `job` for execution on the scheduler.
    ///
    /// The closure runs on the scheduler once it dequeues the submission; it receives the
    /// task's [`TaskContext`] and returns the future the scheduler drives to completion.
    ///
    /// # Errors
    ///
    /// * [`SchedulerError::Stopped`] once [`stop`](Self::stop) has been called or the
    ///   scheduler loop has exited.
    /// * [`SchedulerError::QueueFull`] when a capacity is configured and reached.
    pub fn submit<F, Fut>(&self, job: F) -> Result<TaskHandle, SchedulerError>
    where
        F: FnOnce(TaskContext) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.shutdown.is_cancelled() {
            return Err(SchedulerError::Stopped);
        }
        self.reserve_slot()?;

        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (done, outcome) = oneshot::channel();
        let submission = Submission {
            id,
            job: Box::new(move |ctx: TaskContext| -> JobFuture { Box::pin(job(ctx)) }),
            done,
            submitted_at: Instant::now(),
        };

        if self.sender.send(submission).is_err() {
            self.queued.fetch_sub(1, Ordering::AcqRel);
            return Err(SchedulerError::Stopped);
        }
        trace!(task_id = %id, "Submitted");
        Ok(TaskHandle::new(id, outcome))
    }

    /// Stops the scheduler.
    ///
    /// Running tasks are cancelled at their next suspension point, queued jobs are
    /// discarded, and every later [`submit`](Self::submit) fails with
    /// [`SchedulerError::Stopped`]. Calling it more than once is harmless.
    pub fn stop(&self) {
        if !self.shutdown.is_cancelled() {
            info!(queued = self.queued(), "Stop requested");
        }
        self.shutdown.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled() || self.sender.is_closed()
    }

    /// Number of submissions waiting to be started.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Acquire)
    }

    fn reserve_slot(&self) -> Result<(), SchedulerError> {
        match self.capacity {
            None => {
                self.queued.fetch_add(1, Ordering::AcqRel);
                Ok(())
            }
            Some(capacity) => self
                .queued
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                    (n < capacity).then_some(n + 1)
                })
                .map(|_| ())
                .map_err(|_| SchedulerError::QueueFull(capacity)),
        }
    }
}
