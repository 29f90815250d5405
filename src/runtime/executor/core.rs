use super::worker::Worker;
use crate::runtime::task::Task;
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};
use crate::runtime::work_stealing::queue::LocalQueue;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::debug;

/// The worker pool driving task execution.
///
/// Owns the global injector, the per-worker local queues, and a fixed set
/// of worker threads running the dispatch loop. Workers start with the
/// executor and stop when `shutdown` is signalled.
pub(crate) struct Executor {
    /// Handle to the global ready queue.
    injector: InjectorHandle,

    /// Join handles of the worker threads.
    handles: Vec<JoinHandle<()>>,

    /// Signals workers to exit their dispatch loops.
    shutdown: Arc<AtomicBool>,
}

impl Executor {
    /// Creates an executor with `threads` worker threads.
    pub(crate) fn new(threads: usize) -> Self {
        let injector: InjectorHandle = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let locals: Arc<Vec<Arc<LocalQueue>>> =
            Arc::new((0..threads).map(|_| Arc::new(LocalQueue::new())).collect());

        let mut handles = Vec::with_capacity(threads);

        for id in 0..threads {
            let worker = Worker::new(id, locals.clone(), injector.clone());
            let sd = shutdown.clone();

            let handle = thread::Builder::new()
                .name(format!("fjord-worker-{id}"))
                .spawn(move || worker.run(sd))
                .expect("failed to spawn worker thread");

            handles.push(handle);
        }

        debug!(workers = threads, "worker pool started");

        Self {
            injector,
            handles,
            shutdown,
        }
    }

    /// Returns a handle to the global injector.
    pub(crate) fn injector(&self) -> InjectorHandle {
        self.injector.clone()
    }

    /// Pushes a ready task onto the global injector.
    pub(crate) fn enqueue(&self, task: Arc<Task>) {
        self.injector.push(task);
    }

    /// Signals all workers to stop and wakes any that are parked.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.injector.shutdown();
    }

    /// Joins all worker threads.
    pub(crate) fn join(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }

        debug!("worker pool stopped");
    }
}
