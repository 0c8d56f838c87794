//! Fixed-size worker pool (C5).
//!
//! Submissions are boxed one-shot tasks pushed into an internal
//! channel; each worker thread loops pulling tasks off that channel
//! until it closes. The pool reuses [`crate::channel`] both for task
//! dispatch and, at capacity one, for each task's result slot — a
//! one-shot "future" is nothing more than a bounded channel sent to
//! exactly once, so there is no second synchronization primitive to
//! maintain.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::channel::{self, Receiver, Sender};

/// Returned by [`WorkerPool::submit`] when the pool has already been
/// stopped.
#[derive(Debug, Error)]
#[error("submitted to a stopped worker pool")]
pub struct PoolClosed;

/// The outcome of [`TaskHandle::join`] when the submitted task
/// panicked instead of returning.
#[derive(Error)]
pub enum JoinError {
    #[error("task panicked")]
    Panicked(Box<dyn Any + Send + 'static>),
    /// The pool was dropped (or the task's result slot otherwise lost)
    /// before the task's result could be delivered.
    #[error("worker pool dropped before the task's result was delivered")]
    Disconnected,
}

impl std::fmt::Debug for JoinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinError::Panicked(_) => f.debug_tuple("Panicked").finish_non_exhaustive(),
            JoinError::Disconnected => write!(f, "Disconnected"),
        }
    }
}

type Task = Box<dyn FnOnce() + Send>;

/// A handle to a task submitted via [`WorkerPool::submit`]. Call
/// [`join`](Self::join) to block for its result.
pub struct TaskHandle<T> {
    result_rx: Receiver<thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task completes, returning its value or the
    /// panic it raised.
    pub fn join(self) -> Result<T, JoinError> {
        match self.result_rx.recv() {
            Some(Ok(value)) => Ok(value),
            Some(Err(payload)) => Err(JoinError::Panicked(payload)),
            None => Err(JoinError::Disconnected),
        }
    }
}

/// A fixed-size pool of OS threads that execute submitted closures.
///
/// `submit` never blocks on a full pool — tasks queue in the internal
/// channel until a worker is free — but it does fail fast once the
/// pool has been stopped, rather than handing back a `TaskHandle` that
/// can never resolve.
pub struct WorkerPool {
    task_tx: Sender<Task>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `num_threads` worker threads pulling from an unbounded
    /// internal task channel.
    pub fn new(num_threads: usize) -> Self {
        let (task_tx, task_rx) = channel::unbounded();
        Self::with_channel(num_threads, task_tx, task_rx)
    }

    /// Spawns `num_threads` worker threads over a caller-supplied task
    /// channel — useful for a bounded backlog instead of the default
    /// unbounded one.
    pub fn with_channel(num_threads: usize, task_tx: Sender<Task>, task_rx: Receiver<Task>) -> Self {
        let workers = (0..num_threads)
            .map(|_| {
                let task_rx = task_rx.clone();
                thread::spawn(move || {
                    while let Some(task) = task_rx.recv() {
                        task();
                    }
                })
            })
            .collect();
        Self { task_tx, workers }
    }

    /// Submits `f` for execution by the next free worker. Fails
    /// immediately, without creating a task, if the pool has already
    /// been stopped.
    pub fn submit<T, F>(&self, f: F) -> Result<TaskHandle<T>, PoolClosed>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (result_tx, result_rx) = channel::bounded(1);
        let task: Task = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(f));
            let _ = result_tx.send(outcome);
        });
        self.task_tx.send(task).map_err(|_| PoolClosed)?;
        Ok(TaskHandle { result_rx })
    }

    /// Stops the pool: closes the task channel (any task still queued
    /// is dropped unexecuted) and joins every worker thread.
    /// Idempotent — safe to call more than once, or let `Drop` do it.
    pub fn stop(&mut self) {
        self.task_tx.close();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }

    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }
}

impl Default for WorkerPool {
    /// Sizes the pool to the number of logical CPUs.
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}
