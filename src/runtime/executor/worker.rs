use crate::runtime::context::{CURRENT_WORKER_ID, enter_context};
use crate::runtime::task::{RunOutcome, Task};
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

/// A worker thread in the pool.
///
/// Each worker runs the dispatch loop: find a ready task, drive it for one
/// dispatch, and react to the outcome. The search order is:
/// 1. Pop from the own local queue
/// 2. Steal from the global injector
/// 3. Steal from other workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    /// Unique identifier of the worker.
    id: usize,

    /// All local queues (one per worker), used for stealing.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    /// Handle to the global injector queue.
    injector: InjectorHandle,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        locals: Arc<Vec<Arc<LocalQueue>>>,
        injector: InjectorHandle,
    ) -> Self {
        Self {
            id,
            locals,
            injector,
        }
    }

    /// Runs the worker dispatch loop until shutdown is signalled.
    pub(crate) fn run(&self, shutdown: Arc<AtomicBool>) {
        CURRENT_WORKER_ID.with(|id| *id.borrow_mut() = Some(self.id));

        loop {
            if shutdown.load(Ordering::Acquire) {
                break;
            }

            if let Some(task) = self.locals[self.id].pop() {
                self.dispatch(task);
                continue;
            }

            if let Some(task) = self.injector.steal() {
                self.dispatch(task);
                continue;
            }

            if let Some(task) = self.try_steal() {
                self.dispatch(task);
                continue;
            }

            self.injector.park();
        }

        trace!(worker = self.id, "worker stopped");
    }

    /// Drives one task dispatch and reacts to its outcome.
    ///
    /// A terminal outcome retires the task: its registering scope is
    /// decremented (possibly resuming the scope's owner), or the root
    /// completion is signalled. A suspended task needs no action here; the
    /// decrement that drains its scope re-queues it.
    fn dispatch(&self, task: Arc<Task>) {
        let outcome = enter_context(self.injector.clone(), self.locals.clone(), || {
            task.clone().run()
        });

        match outcome {
            RunOutcome::Completed | RunOutcome::Failed => task.retire(),
            RunOutcome::Suspended | RunOutcome::Resumed | RunOutcome::Skipped => {}
        }
    }

    /// Attempts to steal a task from another worker's local queue.
    ///
    /// Workers are visited in a round-robin fashion to distribute load
    /// evenly.
    fn try_steal(&self) -> Option<Arc<Task>> {
        let len = self.locals.len();

        if len <= 1 {
            return None;
        }

        for i in 0..len {
            let victim = (self.id + i + 1) % len;

            if let Some(task) = self.locals[victim].steal() {
                return Some(task);
            }
        }

        None
    }
}
