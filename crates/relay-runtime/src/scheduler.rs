//! # Task Scheduler
//!
//! The single consumer of the submission queue. It owns the run-set of in-flight tasks
//! and is the only code that ever touches it.

use crate::handle::SchedulerHandle;
use crate::message::Submission;
use crate::task::{TaskContext, TaskId, TaskOutcome};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Bookkeeping for one entry of the run-set.
struct RunningTask {
    id: TaskId,
    interrupted: Arc<AtomicBool>,
    done: oneshot::Sender<TaskOutcome>,
    submitted_at: Instant,
}

/// A cooperative scheduler for independent async jobs.
///
/// # Architecture Note
/// This struct is the "server" half of the scheduler, the same split as an actor and its
/// client: it owns the receiving end of the submission queue and the run-set, while any
/// number of [`SchedulerHandle`]s feed it from other threads.
///
/// **Concurrency Model**:
/// Only [`run`](Self::run) mutates the run-set, one event at a time, so it needs no lock.
/// Jobs never preempt each other; they give up control only at `.await` points such as
/// [`TaskContext::sleep`]. Timed suspensions are parked on the runtime's timer wheel, so
/// many sleeping tasks cost no threads. Driving `run` from a `current_thread` runtime
/// executes every task on one thread; on a multi-thread runtime the tasks share its
/// fixed worker pool.
///
/// # Usage Pattern
///
/// ```rust
/// use relay_runtime::{TaskOutcome, TaskScheduler};
/// use std::time::Duration;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let (scheduler, handle) = TaskScheduler::new();
///     let running = tokio::spawn(scheduler.run());
///
///     let task = handle
///         .submit(|ctx| async move {
///             let _ = ctx.sleep(Duration::from_millis(5)).await;
///         })
///         .unwrap();
///     assert_eq!(task.join().await, TaskOutcome::Completed);
///
///     handle.stop();
///     running.await.unwrap();
/// }
/// ```
///
/// # Shutdown
///
/// After [`SchedulerHandle::stop`] the loop stops dequeuing, reports every queued job as
/// [`TaskOutcome::Cancelled`] without starting it, and waits for the running tasks to
/// observe the stop at their next suspension point. Work between suspension points (an
/// in-flight publish, say) runs to completion. If every handle is dropped instead, the
/// loop waits for the running tasks without cancelling them.
pub struct TaskScheduler {
    receiver: mpsc::UnboundedReceiver<Submission>,
    shutdown: CancellationToken,
    queued: Arc<AtomicUsize>,
    running: JoinSet<()>,
    tasks: HashMap<tokio::task::Id, RunningTask>,
}

impl TaskScheduler {
    /// Creates a scheduler with an unbounded submission queue and its handle.
    pub fn new() -> (Self, SchedulerHandle) {
        Self::with_capacity(None)
    }

    /// Creates a scheduler whose queue holds at most `capacity` unstarted jobs when set.
    ///
    /// # Returns
    ///
    /// 1. The `TaskScheduler`, which must be driven via `.run()`.
    /// 2. A `SchedulerHandle`, which can be cloned and shared with any thread.
    pub fn with_capacity(capacity: Option<usize>) -> (Self, SchedulerHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let queued = Arc::new(AtomicUsize::new(0));
        let scheduler = Self {
            receiver,
            shutdown: shutdown.clone(),
            queued: Arc::clone(&queued),
            running: JoinSet::new(),
            tasks: HashMap::new(),
        };
        let handle = SchedulerHandle::new(sender, shutdown, queued, capacity);
        (scheduler, handle)
    }

    /// Runs the scheduler loop until it is stopped or every handle is dropped.
    pub async fn run(mut self) {
        info!("Scheduler started");

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                Some(joined) = self.running.join_next_with_id(), if !self.running.is_empty() => {
                    self.reap(joined);
                }
                submission = self.receiver.recv() => match submission {
                    Some(submission) => self.start(submission),
                    None => break,
                },
            }
        }

        self.receiver.close();
        let mut discarded = 0usize;
        while let Ok(submission) = self.receiver.try_recv() {
            self.queued.fetch_sub(1, Ordering::AcqRel);
            debug!(task_id = %submission.id, "Discarded before start");
            let _ = submission.done.send(TaskOutcome::Cancelled);
            discarded += 1;
        }

        let in_flight = self.running.len();
        info!(in_flight, discarded, "Draining scheduler");
        while let Some(joined) = self.running.join_next_with_id().await {
            self.reap(joined);
        }

        info!("Scheduler stopped");
    }

    fn start(&mut self, submission: Submission) {
        self.queued.fetch_sub(1, Ordering::AcqRel);
        let Submission {
            id,
            job,
            done,
            submitted_at,
        } = submission;

        let ctx = TaskContext::new(id, self.shutdown.child_token());
        let interrupted = ctx.interrupted();
        let abort = self.running.spawn(job(ctx));
        self.tasks.insert(
            abort.id(),
            RunningTask {
                id,
                interrupted,
                done,
                submitted_at,
            },
        );
        debug!(
            task_id = %id,
            queued_for = ?submitted_at.elapsed(),
            running = self.tasks.len(),
            "Started"
        );
    }

    fn reap(&mut self, joined: Result<(tokio::task::Id, ()), JoinError>) {
        let (runtime_id, failure) = match joined {
            Ok((runtime_id, ())) => (runtime_id, None),
            Err(e) => {
                let outcome = if e.is_panic() {
                    TaskOutcome::Panicked
                } else {
                    TaskOutcome::Cancelled
                };
                (e.id(), Some(outcome))
            }
        };

        let Some(task) = self.tasks.remove(&runtime_id) else {
            warn!(%runtime_id, "Reaped a task the scheduler does not know");
            return;
        };

        let outcome = failure.unwrap_or_else(|| {
            if task.interrupted.load(Ordering::Acquire) {
                TaskOutcome::Cancelled
            } else {
                TaskOutcome::Completed
            }
        });
        let lifetime = task.submitted_at.elapsed();
        match outcome {
            TaskOutcome::Completed => {
                debug!(task_id = %task.id, ?lifetime, running = self.tasks.len(), "Completed")
            }
            TaskOutcome::Cancelled => {
                info!(task_id = %task.id, ?lifetime, running = self.tasks.len(), "Cancelled")
            }
            TaskOutcome::Panicked => {
                error!(task_id = %task.id, ?lifetime, running = self.tasks.len(), "Task panicked")
            }
        }
        let _ = task.done.send(outcome);
    }
}
