// src/pipeline/queue.rs
//! One-at-a-time job execution.
//!
//! Jobs are boxed futures sent over an unbounded channel to a single worker
//! task. The worker runs each job to completion (success, error or panic)
//! before taking the next one, so jobs execute strictly in submission order
//! and never overlap.

use crate::error::QueueError;
use log::{debug, error};
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle as TaskHandle};

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A submitted job: its full pipeline plus the channel its result goes to,
/// both captured in `task`.
struct QueueEntry {
    id: u64,
    task: Task,
}

pub struct JobQueue {
    sender: async_channel::Sender<QueueEntry>,
    next_id: AtomicU64,
    pending: Arc<AtomicUsize>,
    worker: Mutex<Option<TaskHandle<()>>>,
}

impl JobQueue {
    /// Starts the worker. Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let (sender, receiver) = async_channel::unbounded::<QueueEntry>();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker = task::spawn(run_worker(receiver));

        Self {
            sender,
            next_id: AtomicU64::new(1),
            pending,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Schedules `job` after every previously enqueued job.
    ///
    /// The returned handle resolves with the job's own result. A failing job
    /// is also logged here, and never affects the jobs around it.
    pub fn enqueue<F, Fut, T, E>(&self, job: F) -> JobHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + From<QueueError> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (result_tx, result_rx) = oneshot::channel();

        let in_flight = InFlight::enter(&self.pending);
        let task: Task = Box::pin(async move {
            let result = job().await;
            if let Err(e) = &result {
                error!("[QUEUE] Print queue task failed (job #{}): {}", id, e);
            }
            drop(in_flight);
            if result_tx.send(result).is_err() {
                debug!("[QUEUE] Job #{} finished but nobody is waiting for it", id);
            }
        });

        if self.sender.try_send(QueueEntry { id, task }).is_err() {
            return JobHandle {
                state: HandleState::Closed,
            };
        }

        debug!("[QUEUE] Enqueued job #{}", id);
        JobHandle {
            state: HandleState::Waiting(result_rx),
        }
    }

    /// Jobs enqueued but not yet settled, including the running one.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Stops accepting jobs and waits until the ones already queued settle.
    pub async fn shutdown(&self) {
        self.sender.close();
        let worker = self.worker.lock().ok().and_then(|mut w| w.take());
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                error!("[QUEUE] Worker ended abnormally: {}", e);
            }
        }
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_worker(receiver: async_channel::Receiver<QueueEntry>) {
    while let Ok(QueueEntry { id, task: job }) = receiver.recv().await {
        debug!("[QUEUE] Starting job #{}", id);
        // A separate task contains panics to the job that raised them.
        let outcome = task::spawn(job).await;
        if let Err(e) = outcome {
            error!("[QUEUE] Print queue task failed (job #{}): {}", id, e);
        }
    }
    debug!("[QUEUE] Channel closed, worker exiting.");
}

/// Counts a job as pending from submission until it settles. Dropped
/// before the result is sent, or during unwinding if the job panics.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        InFlight(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Resolves with the result of one enqueued job.
pub struct JobHandle<T, E> {
    state: HandleState<T, E>,
}

enum HandleState<T, E> {
    Waiting(oneshot::Receiver<Result<T, E>>),
    Closed,
}

impl<T, E> Unpin for JobHandle<T, E> {}

impl<T, E> Future for JobHandle<T, E>
where
    E: From<QueueError>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            HandleState::Waiting(receiver) => Pin::new(receiver)
                .poll(cx)
                .map(|received| received.unwrap_or_else(|_| Err(E::from(QueueError::Abandoned)))),
            HandleState::Closed => Poll::Ready(Err(E::from(QueueError::Closed))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrintError;
    use std::time::Duration;

    #[tokio::test]
    async fn results_are_delivered_per_job() {
        let queue = JobQueue::new();
        let ok = queue.enqueue(|| async { Ok::<_, PrintError>(1) });
        let failed =
            queue.enqueue(|| async { Err::<u32, _>(PrintError::PrintFailed("jam".into())) });
        let ok_again = queue.enqueue(|| async { Ok::<_, PrintError>(3) });

        assert_eq!(ok.await, Ok(1));
        assert_eq!(failed.await, Err(PrintError::PrintFailed("jam".into())));
        assert_eq!(ok_again.await, Ok(3));
    }

    #[tokio::test]
    async fn panicking_job_is_abandoned_and_queue_continues() {
        let queue = JobQueue::new();
        let panicked = queue.enqueue(|| async {
            if true {
                panic!("boom");
            }
            Ok::<u32, PrintError>(0)
        });
        let next = queue.enqueue(|| async { Ok::<_, PrintError>(2) });

        assert_eq!(panicked.await, Err(PrintError::Queue(QueueError::Abandoned)));
        assert_eq!(next.await, Ok(2));
    }

    #[tokio::test]
    async fn pending_counts_unsettled_jobs() {
        let queue = JobQueue::new();
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let first = queue.enqueue(|| async move {
            let _ = release_rx.await;
            Ok::<_, PrintError>(())
        });
        let second = queue.enqueue(|| async { Ok::<_, PrintError>(()) });
        assert_eq!(queue.pending(), 2);

        release_tx.send(()).unwrap();
        first.await.unwrap();
        second.await.unwrap();
        assert_eq!(queue.pending(), 0);
    }

    #[tokio::test]
    async fn shutdown_drains_then_rejects() {
        let queue = JobQueue::new();
        let slow = queue.enqueue(|| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, PrintError>("done")
        });

        queue.shutdown().await;
        assert!(queue.is_closed());
        assert_eq!(slow.await, Ok("done"));

        let rejected = queue.enqueue(|| async { Ok::<_, PrintError>("late") });
        assert_eq!(rejected.await, Err(PrintError::Queue(QueueError::Closed)));
    }
}
