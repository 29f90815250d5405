use crate::runtime::task::Task;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Shared handle to the global ready queue.
pub(crate) type InjectorHandle = Arc<Injector>;

/// Global ready queue of the work-stealing scheduler.
///
/// Newly spawned and re-queued tasks are pushed here before being picked up
/// by worker threads. The injector also coordinates worker parking through
/// a condition variable, so idle workers sleep instead of spinning.
pub(crate) struct Injector {
    /// Queue of tasks eligible to run now.
    queue: Mutex<VecDeque<Arc<Task>>>,

    /// Number of parked worker threads.
    parked: Mutex<usize>,

    /// Condition variable used to wake parked workers.
    condvar: Condvar,

    /// Indicates that the worker pool is shutting down.
    shutdown: AtomicBool,
}

impl Injector {
    /// Creates a new empty injector.
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            parked: Mutex::new(0),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals shutdown and wakes all parked workers.
    ///
    /// Tasks still queued at this point are abandoned; shutdown is only
    /// safe once the runtime is idle.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.condvar.notify_all();
    }

    /// Pushes a ready task onto the queue and wakes parked workers.
    pub(crate) fn push(&self, task: Arc<Task>) {
        self.queue.lock().unwrap().push_back(task);
        self.condvar.notify_all();
    }

    /// Parks the current worker thread until work may be available or a
    /// shutdown signal is received.
    ///
    /// Workers only park while the queue is empty. The park uses a timed
    /// wait so a wakeup lost between the emptiness check and the wait is
    /// recovered on the next iteration.
    pub(crate) fn park(&self) {
        if self.shutdown.load(Ordering::Acquire) {
            return;
        }

        if !self.queue.lock().unwrap().is_empty() {
            return;
        }

        let mut parked = self.parked.lock().unwrap();
        *parked += 1;

        let (mut parked, _) = self
            .condvar
            .wait_timeout(parked, Duration::from_millis(1))
            .unwrap();

        *parked -= 1;
    }

    /// Takes a task from the front of the queue.
    ///
    /// Returns `None` if no tasks are available.
    pub(crate) fn steal(&self) -> Option<Arc<Task>> {
        self.queue.lock().unwrap().pop_front()
    }
}
