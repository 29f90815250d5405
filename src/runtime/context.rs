use crate::runtime::task::Task;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Thread-local handle to the global injector queue.
    ///
    /// Installed while a worker runs tasks; used by the constructs to
    /// enqueue newly spawned children.
    pub(crate) static CURRENT_INJECTOR: RefCell<Option<InjectorHandle>> =
        const { RefCell::new(None) };

    /// The task currently being polled on this thread.
    ///
    /// Installed around every poll and restored afterwards, so nothing
    /// keyed by OS thread identity survives a suspension: a task resumed on
    /// a different worker thread sees a consistent context.
    pub(crate) static CURRENT_TASK: RefCell<Option<Arc<Task>>> =
        const { RefCell::new(None) };

    /// Thread-local identifier of the current worker thread.
    pub(crate) static CURRENT_WORKER_ID: RefCell<Option<usize>> =
        const { RefCell::new(None) };

    /// Thread-local references to all local worker queues.
    ///
    /// Allows spawning onto the current worker's local queue without global
    /// synchronization.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<Arc<Vec<Arc<LocalQueue>>>>> =
        const { RefCell::new(None) };
}

/// Enters the runtime execution context for the current thread.
///
/// Temporarily installs the injector and local-queue handles for the
/// duration of the closure `f`, restoring the previous context afterwards.
/// This lets the constructs reach the scheduler without threading handles
/// through every call.
pub(crate) fn enter_context<R>(
    injector: InjectorHandle,
    locals: Arc<Vec<Arc<LocalQueue>>>,
    f: impl FnOnce() -> R,
) -> R {
    CURRENT_INJECTOR.with(|i| {
        CURRENT_LOCALS.with(|l| {
            let prev_i = i.replace(Some(injector));
            let prev_l = l.replace(Some(locals));

            let out = f();

            l.replace(prev_l);
            i.replace(prev_i);

            out
        })
    })
}

/// Returns the task currently executing on this thread, if any.
pub(crate) fn current_task() -> Option<Arc<Task>> {
    CURRENT_TASK.with(|cell| cell.borrow().clone())
}
