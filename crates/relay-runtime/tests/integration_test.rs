use relay_runtime::{SchedulerError, TaskOutcome, TaskScheduler};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A job submitted from a thread with no async runtime runs on the scheduler.
#[tokio::test]
async fn test_submit_from_foreign_thread() {
    let (scheduler, handle) = TaskScheduler::new();
    let loop_handle = tokio::spawn(scheduler.run());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let submitter = handle.clone();
    let seen_in_job = seen.clone();
    let tasks = std::thread::spawn(move || {
        (0..5)
            .map(|i| {
                let seen = seen_in_job.clone();
                submitter
                    .submit(move |_ctx| async move {
                        seen.lock().unwrap().push(i);
                    })
                    .expect("scheduler accepts work")
            })
            .collect::<Vec<_>>()
    })
    .join()
    .unwrap();

    for task in tasks {
        assert_eq!(task.join().await, TaskOutcome::Completed);
    }
    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);

    handle.stop();
    loop_handle.await.unwrap();
}

/// Sleeping tasks wake in deadline order, not submission order.
#[tokio::test(start_paused = true)]
async fn test_tasks_complete_in_delay_order() {
    let (scheduler, handle) = TaskScheduler::new();
    let loop_handle = tokio::spawn(scheduler.run());

    let finished = Arc::new(Mutex::new(Vec::new()));
    let mut tasks = Vec::new();
    for (name, secs) in [("slow", 5), ("fast", 1), ("medium", 3)] {
        let finished = finished.clone();
        let task = handle
            .submit(move |ctx| async move {
                if ctx.sleep(Duration::from_secs(secs)).await.is_ok() {
                    finished.lock().unwrap().push(name);
                }
            })
            .unwrap();
        tasks.push(task);
    }

    for task in tasks {
        assert_eq!(task.join().await, TaskOutcome::Completed);
    }
    assert_eq!(*finished.lock().unwrap(), vec!["fast", "medium", "slow"]);

    handle.stop();
    loop_handle.await.unwrap();
}

/// One long sleeper does not hold up later short jobs.
#[tokio::test(start_paused = true)]
async fn test_sleeping_task_does_not_block_others() {
    let (scheduler, handle) = TaskScheduler::new();
    let loop_handle = tokio::spawn(scheduler.run());

    let sleeper = handle
        .submit(|ctx| async move {
            let _ = ctx.sleep(Duration::from_secs(3600)).await;
        })
        .unwrap();
    let start = tokio::time::Instant::now();
    let quick = handle.submit(|_ctx| async {}).unwrap();

    assert_eq!(quick.join().await, TaskOutcome::Completed);
    assert!(start.elapsed() < Duration::from_secs(1));

    handle.stop();
    assert_eq!(sleeper.join().await, TaskOutcome::Cancelled);
    loop_handle.await.unwrap();
}

/// After stop: submissions fail and sleeping tasks never resume.
#[tokio::test(start_paused = true)]
async fn test_stop_cancels_sleeping_tasks_and_rejects_new_work() {
    let (scheduler, handle) = TaskScheduler::new();
    let loop_handle = tokio::spawn(scheduler.run());

    let resumed = Arc::new(Mutex::new(false));
    let flag = resumed.clone();
    let sleeper = handle
        .submit(move |ctx| async move {
            if ctx.sleep(Duration::from_secs(5)).await.is_ok() {
                *flag.lock().unwrap() = true;
            }
        })
        .unwrap();

    // Let the scheduler start the task before stopping.
    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.stop();

    assert!(handle.is_stopped());
    assert_eq!(
        handle.submit(|_ctx| async {}).unwrap_err(),
        SchedulerError::Stopped
    );
    assert_eq!(sleeper.join().await, TaskOutcome::Cancelled);
    loop_handle.await.unwrap();
    assert!(!*resumed.lock().unwrap());
}

/// Jobs still queued when the scheduler stops are reported cancelled without running.
#[tokio::test]
async fn test_stop_discards_unstarted_jobs() {
    let (scheduler, handle) = TaskScheduler::new();

    let ran = Arc::new(Mutex::new(false));
    let flag = ran.clone();
    let queued = handle
        .submit(move |_ctx| async move {
            *flag.lock().unwrap() = true;
        })
        .unwrap();
    assert_eq!(handle.queued(), 1);

    handle.stop();
    scheduler.run().await;

    assert_eq!(queued.join().await, TaskOutcome::Cancelled);
    assert!(!*ran.lock().unwrap());
    assert_eq!(handle.queued(), 0);
}

/// A panicking task is isolated from the rest of the run-set.
#[tokio::test]
async fn test_panicking_task_is_isolated() {
    let (scheduler, handle) = TaskScheduler::new();
    let loop_handle = tokio::spawn(scheduler.run());

    let bad = handle
        .submit(|_ctx| async {
            panic!("kitchen on fire");
        })
        .unwrap();
    assert_eq!(bad.join().await, TaskOutcome::Panicked);

    let good = handle.submit(|_ctx| async {}).unwrap();
    assert_eq!(good.join().await, TaskOutcome::Completed);

    handle.stop();
    loop_handle.await.unwrap();
}

/// A bounded queue rejects new work instead of growing.
#[tokio::test]
async fn test_bounded_queue_rejects_new_submissions() {
    let (scheduler, handle) = TaskScheduler::with_capacity(Some(2));

    let first = handle.submit(|_ctx| async {}).unwrap();
    let second = handle.submit(|_ctx| async {}).unwrap();
    assert_eq!(
        handle.submit(|_ctx| async {}).unwrap_err(),
        SchedulerError::QueueFull(2)
    );
    assert_ne!(first.id(), second.id());

    let loop_handle = tokio::spawn(scheduler.run());
    assert_eq!(first.join().await, TaskOutcome::Completed);
    assert_eq!(second.join().await, TaskOutcome::Completed);

    // Slots free up once the scheduler has dequeued the jobs.
    let third = handle.submit(|_ctx| async {}).unwrap();
    assert_eq!(third.join().await, TaskOutcome::Completed);

    handle.stop();
    loop_handle.await.unwrap();
}

/// Dropping every handle lets running tasks finish instead of cancelling them.
#[tokio::test(start_paused = true)]
async fn test_dropping_handles_drains_without_cancelling() {
    let (scheduler, handle) = TaskScheduler::new();
    let loop_handle = tokio::spawn(scheduler.run());

    let task = handle
        .submit(|ctx| async move {
            ctx.sleep(Duration::from_secs(2)).await.unwrap();
        })
        .unwrap();
    drop(handle);

    assert_eq!(task.join().await, TaskOutcome::Completed);
    loop_handle.await.unwrap();
}
