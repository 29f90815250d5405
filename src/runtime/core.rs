use crate::constructs;
use crate::error::{self, Error};
use crate::runtime::executor::Executor;
use crate::runtime::task::Task;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use tracing::debug;

/// The runtime handle.
///
/// A `Runtime` owns the worker pool and drives one top-level application at
/// a time via [`launch`](Self::launch). The pool starts with the runtime and
/// is torn down when the runtime is dropped, so the free-standing
/// [`launch`](crate::launch) function — which builds a runtime, launches,
/// and drops it — constructs and tears down the pool around every
/// application.
pub struct Runtime {
    /// Worker pool executing tasks.
    executor: Executor,

    /// Guards against concurrent top-level applications on this instance.
    active: AtomicBool,
}

impl Runtime {
    /// Creates a new runtime with `worker_threads` workers.
    pub(crate) fn new(worker_threads: usize) -> Self {
        Self {
            executor: Executor::new(worker_threads),
            active: AtomicBool::new(false),
        }
    }

    /// Runs one application to completion, blocking the calling thread.
    ///
    /// The body is wrapped in an implicit root finish scope, exactly as an
    /// explicit [`finish`](crate::finish) would wrap it, so `launch` returns
    /// only once every task transitively spawned by the body has reached a
    /// terminal state.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyLaunched`] if this runtime instance is already
    ///   driving an application.
    /// - [`Error::TaskFailed`] if the root task, or any task transitively
    ///   spawned under it, panicked; the message renders the first captured
    ///   failure.
    pub fn launch<F>(&self, body: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.active.swap(true, Ordering::AcqRel) {
            return Err(Error::AlreadyLaunched);
        }

        let (signal, done) = mpsc::channel();

        // The implicit root finish scope: the root body is the original
        // body run under a `finish`, so even bare `async_` calls at the top
        // level have an enclosing scope to register against.
        let root = Arc::new(Task::root(
            async move { constructs::finish(body).await },
            signal,
            self.executor.injector(),
        ));

        debug!(task = root.id(), "launching root task");
        self.executor.enqueue(root);

        // One-shot completion signal; the root task's terminal transition
        // sends exactly one message.
        let result = done
            .recv()
            .expect("worker pool shut down before the root task completed");

        self.active.store(false, Ordering::Release);

        result.map_err(|payload| Error::TaskFailed(error::render_payload(payload.as_ref())))
    }
}

impl Drop for Runtime {
    /// Shuts down the worker pool: signal shutdown, wake parked workers,
    /// and join all worker threads.
    ///
    /// Tasks still queued at this point are abandoned, so dropping the
    /// runtime is only safe once it is idle (after `launch` has returned).
    fn drop(&mut self) {
        self.executor.shutdown();
        self.executor.join();
    }
}
