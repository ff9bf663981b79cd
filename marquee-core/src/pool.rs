//! Shared, fixed-capacity worker pool for upstream work.
//!
//! One pool is created at startup and cloned into every component that talks
//! to the provider. Each submitted task is spawned onto the Tokio runtime and
//! waits for a permit before it runs, so at most `capacity` tasks execute at
//! once across every in-flight aggregation; the rest queue in FIFO order.
//!
//! Only leaf tasks (a single upstream exchange) should be submitted. Futures
//! that join other pool tasks must run outside the pool, otherwise a small
//! pool could be filled entirely by waiters.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
    task::{Context, Poll},
};

use tokio::{sync::Semaphore, task::JoinHandle};
use tracing::{debug, info};

use crate::error::PoolError;

pub const DEFAULT_POOL_CAPACITY: usize = 10;

#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    capacity: usize,
    permits: Arc<Semaphore>,
    running: AtomicUsize,
    high_water: AtomicUsize,
    submitted: AtomicU64,
    completed: AtomicU64,
}

/// Point-in-time counters for a [`WorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: usize,
    pub running: usize,
    /// Highest number of tasks that ever ran at the same time.
    pub high_water: usize,
    pub submitted: u64,
    pub completed: u64,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("WorkerPool")
            .field("capacity", &stats.capacity)
            .field("running", &stats.running)
            .field("high_water", &stats.high_water)
            .field("submitted", &stats.submitted)
            .field("completed", &stats.completed)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl WorkerPool {
    /// Creates a pool; a capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        debug!(capacity, "worker pool created");
        Self {
            inner: Arc::new(PoolInner {
                capacity,
                permits: Arc::new(Semaphore::new(capacity)),
                running: AtomicUsize::new(0),
                high_water: AtomicUsize::new(0),
                submitted: AtomicU64::new(0),
                completed: AtomicU64::new(0),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Queues `task` and returns a handle to its output.
    ///
    /// The task runs to completion even if the handle is dropped. Must be
    /// called from within a Tokio runtime.
    pub fn submit<F, T>(&self, task: F) -> PoolTask<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        inner.submitted.fetch_add(1, Ordering::Relaxed);

        let handle = tokio::spawn(async move {
            let _permit = Arc::clone(&inner.permits)
                .acquire_owned()
                .await
                .map_err(|_| PoolError::Closed)?;
            let _slot = RunningSlot::enter(&inner);
            Ok(task.await)
        });

        PoolTask { handle }
    }

    /// Submits every job, then waits for all of them.
    ///
    /// The i-th output belongs to the i-th job regardless of completion
    /// order.
    pub async fn run_all<I, F, T>(&self, jobs: I) -> Vec<Result<T, PoolError>>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let tasks: Vec<PoolTask<T>> =
            jobs.into_iter().map(|job| self.submit(job)).collect();
        futures::future::join_all(tasks).await
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.inner.capacity,
            running: self.inner.running.load(Ordering::Acquire),
            high_water: self.inner.high_water.load(Ordering::Acquire),
            submitted: self.inner.submitted.load(Ordering::Relaxed),
            completed: self.inner.completed.load(Ordering::Relaxed),
        }
    }

    /// Stops admitting work. Running tasks finish; queued and future tasks
    /// resolve to [`PoolError::Closed`].
    pub fn shutdown(&self) {
        if !self.inner.permits.is_closed() {
            self.inner.permits.close();
            let stats = self.stats();
            info!(
                submitted = stats.submitted,
                completed = stats.completed,
                high_water = stats.high_water,
                "worker pool shut down"
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.permits.is_closed()
    }
}

/// Tracks one executing task. Dropped before the permit is released, so the
/// running count never exceeds capacity.
struct RunningSlot<'a> {
    inner: &'a PoolInner,
}

impl<'a> RunningSlot<'a> {
    fn enter(inner: &'a PoolInner) -> Self {
        let running = inner.running.fetch_add(1, Ordering::AcqRel) + 1;
        inner.high_water.fetch_max(running, Ordering::AcqRel);
        Self { inner }
    }
}

impl Drop for RunningSlot<'_> {
    fn drop(&mut self) {
        self.inner.running.fetch_sub(1, Ordering::AcqRel);
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Handle to a task submitted to a [`WorkerPool`].
#[derive(Debug)]
pub struct PoolTask<T> {
    handle: JoinHandle<Result<T, PoolError>>,
}

impl<T> Future for PoolTask<T> {
    type Output = Result<T, PoolError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(output)) => Poll::Ready(output),
            Poll::Ready(Err(err)) if err.is_panic() => {
                Poll::Ready(Err(PoolError::Panicked))
            }
            Poll::Ready(Err(_)) => Poll::Ready(Err(PoolError::Closed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn run_all_returns_results_in_submission_order() {
        let pool = WorkerPool::new(3);

        let jobs = (0..6u64).map(|i| async move {
            // Later jobs finish first.
            tokio::time::sleep(Duration::from_millis(60 - i * 10)).await;
            i
        });

        let results = pool.run_all(jobs).await;
        let values: Vec<u64> =
            results.into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrency_never_exceeds_capacity() {
        let pool = WorkerPool::new(2);

        let jobs = (0..10).map(|_| async {
            tokio::time::sleep(Duration::from_millis(15)).await;
        });
        let results = pool.run_all(jobs).await;

        assert!(results.iter().all(Result::is_ok));
        let stats = pool.stats();
        assert_eq!(stats.high_water, 2);
        assert_eq!(stats.submitted, 10);
        assert_eq!(stats.completed, 10);
        assert_eq!(stats.running, 0);
    }

    #[tokio::test]
    async fn zero_capacity_is_raised_to_one() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.capacity(), 1);
        assert_eq!(pool.submit(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn shutdown_rejects_new_work() {
        let pool = WorkerPool::new(1);
        pool.shutdown();

        assert!(pool.is_closed());
        assert_eq!(pool.submit(async { 1 }).await, Err(PoolError::Closed));
    }

    #[tokio::test]
    async fn panicking_task_is_reported_not_propagated() {
        let pool = WorkerPool::new(1);
        let outcome: Result<(), PoolError> = pool
            .submit(async {
                panic!("boom");
            })
            .await;
        assert_eq!(outcome, Err(PoolError::Panicked));

        // The permit came back.
        assert_eq!(pool.submit(async { "ok" }).await, Ok("ok"));
        assert_eq!(pool.stats().running, 0);
    }
}
