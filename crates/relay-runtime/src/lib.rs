//! # Relay Runtime
//!
//! A small cooperative scheduler for running many independent async jobs that are
//! submitted from threads the scheduler does not control.
//!
//! ## Why a scheduler in front of the runtime?
//!
//! A message-bus client typically delivers messages on its own I/O thread through a
//! callback. That thread must never block, and it has no async context of its own. Spawning
//! detached futures from it would leave nobody owning them, so there would be nothing to
//! cancel at shutdown. This crate puts one owner in between:
//!
//! - **Handoff**: the callback calls [`SchedulerHandle::submit`], which only pushes onto a
//!   multi-producer queue and returns immediately.
//! - **Ownership**: the [`TaskScheduler`] loop is the single consumer. It starts each job,
//!   keeps it in its run-set under a [`TaskId`], and reaps it when it finishes.
//! - **Cancellation**: [`SchedulerHandle::stop`] cancels every task at its next suspension
//!   point ([`TaskContext::sleep`]) and rejects later submissions with
//!   [`SchedulerError::Stopped`].
//!
//! ## Architecture Overview
//!
//! 1. **Interface Layer** ([`SchedulerHandle`]) - thread-safe submission and stop
//! 2. **Runtime Layer** ([`TaskScheduler`]) - the loop that owns the run-set
//! 3. **Task Layer** ([`TaskContext`], [`TaskHandle`], [`TaskOutcome`]) - what a job sees,
//!    and what its submitter gets back
//!
//! ## Example
//!
//! ```rust
//! use relay_runtime::{SchedulerError, TaskScheduler};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let (scheduler, handle) = TaskScheduler::new();
//!     let running = tokio::spawn(scheduler.run());
//!
//!     // Any thread may submit; the closure runs on the scheduler.
//!     let submitter = handle.clone();
//!     let task = std::thread::spawn(move || {
//!         submitter.submit(|ctx| async move {
//!             if ctx.sleep(Duration::from_millis(10)).await.is_ok() {
//!                 println!("{} done", ctx.id());
//!             }
//!         })
//!     })
//!     .join()
//!     .unwrap()
//!     .unwrap();
//!
//!     task.join().await;
//!     handle.stop();
//!     assert_eq!(handle.submit(|_| async {}).unwrap_err(), SchedulerError::Stopped);
//!     running.await.unwrap();
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Tasks are cooperative: they yield only at `.await` points
//! - The run-set is mutated only by the scheduler loop (single writer)
//! - Nothing but the submission queue is shared with foreign threads
//! - A panicking task is reported as [`TaskOutcome::Panicked`] and does not affect others

pub mod error;
pub mod handle;
pub mod message;
pub mod scheduler;
pub mod task;
pub mod tracing;

// Re-export core types for convenience
pub use error::{Cancelled, SchedulerError, TracingError};
pub use handle::SchedulerHandle;
pub use message::{Job, JobFuture, Submission};
pub use scheduler::TaskScheduler;
pub use task::{TaskContext, TaskHandle, TaskId, TaskOutcome};
pub use tokio_util::sync::CancellationToken;
