use crate::runtime::task::Task;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A per-worker local task queue.
///
/// Tasks spawned by a running task are pushed onto the spawning worker's
/// local queue and popped from the back (LIFO), which keeps freshly forked
/// children cache-warm. Other workers steal from the front (FIFO) to
/// balance load across the pool.
pub(crate) struct LocalQueue {
    /// Inner deque protected by a mutex.
    inner: Mutex<VecDeque<Arc<Task>>>,
}

impl LocalQueue {
    /// Creates an empty local task queue.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Pushes a task onto the back of the local queue.
    pub(crate) fn push(&self, task: Arc<Task>) {
        self.inner.lock().unwrap().push_back(task);
    }

    /// Pops a task from the back of the local queue.
    pub(crate) fn pop(&self) -> Option<Arc<Task>> {
        self.inner.lock().unwrap().pop_back()
    }

    /// Steals a task from the front of the local queue.
    ///
    /// Intended for use by other worker threads.
    pub(crate) fn steal(&self) -> Option<Arc<Task>> {
        self.inner.lock().unwrap().pop_front()
    }
}
