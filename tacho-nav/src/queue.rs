//! Deferred execution for work that must not run inside a load.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere to put work that runs after the current call returns.
pub trait TaskQueue: Send + Sync {
    /// Enqueue `task` at the back. Must not run it synchronously.
    fn defer(&self, task: Task);
}

/// FIFO drained explicitly by the host loop.
///
/// Plays the role of a zero-delay timer in a single-threaded host: tasks
/// queued during a load run on the next `run_pending` call.
#[derive(Default)]
pub struct DeferredQueue {
    pending: Mutex<VecDeque<Task>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run queued tasks until the queue is empty, including tasks queued
    /// by the tasks themselves. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop() {
            task();
            ran += 1;
        }
        ran
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn pop(&self) -> Option<Task> {
        // lock released before the task runs so it may defer more work
        self.lock().pop_front()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Task>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskQueue for DeferredQueue {
    fn defer(&self, task: Task) {
        self.lock().push_back(task);
    }
}

impl std::fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue").field("pending", &self.len()).finish()
    }
}

/// Runs each task on the rayon global pool, independently of the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPoolQueue;

impl TaskQueue for ThreadPoolQueue {
    fn defer(&self, task: Task) {
        rayon::spawn(task);
    }
}
