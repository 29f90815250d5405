use super::state::{COMPLETED, FAILED, NOTIFIED, READY, RUNNING, WAITING};
use crate::runtime::context::CURRENT_TASK;
use crate::runtime::scope::FinishScope;
use crate::runtime::task::waker::make_waker;
use crate::runtime::work_stealing::injector::InjectorHandle;

use std::any::Any;
use std::cell::UnsafeCell;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tracing::trace;

/// Result of one dispatch of a task, inspected by the worker loop.
pub(crate) enum RunOutcome {
    /// The body ran to completion.
    Completed,
    /// The body panicked; the payload is captured on the task.
    Failed,
    /// The body yielded waiting on a finish scope; the task is parked and
    /// will be re-queued by the decrement that drains the scope.
    Suspended,
    /// The body yielded but was woken mid-poll; it has already been
    /// re-queued.
    Resumed,
    /// The task was not in a runnable state; nothing was executed.
    Skipped,
}

/// Where a task reports its terminal transition.
enum Completion {
    /// Non-root task: decrement the finish scope it was registered under.
    Scope(Arc<FinishScope>),
    /// Root task: signal the thread blocked in `launch`.
    Root(Mutex<Option<Sender<Result<(), Box<dyn Any + Send>>>>>),
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);

/// A schedulable unit of work in the fork-join graph.
///
/// A `Task` wraps one suspendable body together with its scheduling
/// metadata: the atomic status word, the stack of enclosing finish scopes,
/// and the scope (or root signal) notified when the task reaches a terminal
/// state.
pub(crate) struct Task {
    /// Identifier used for logging.
    id: u64,

    /// The suspendable body driven by this task.
    ///
    /// Wrapped in `UnsafeCell` for interior mutability during polls; the
    /// RUNNING state guarantees a single poller at a time.
    body: UnsafeCell<Pin<Box<dyn Future<Output = ()> + Send>>>,

    /// The current lifecycle state of the task (READY, RUNNING, etc.).
    state: AtomicUsize,

    /// Enclosing finish scopes; the top entry is the innermost scope that
    /// new `async_` children register against.
    ///
    /// Only the worker currently driving the task touches this stack, so
    /// the mutex is uncontended.
    scopes: Mutex<Vec<Arc<FinishScope>>>,

    /// Terminal-transition target: registering scope or root signal.
    completion: Completion,

    /// Panic payload captured from the body when the task failed.
    failure: Mutex<Option<Box<dyn Any + Send>>>,

    /// Global injector used to re-queue this task on wake.
    injector: InjectorHandle,
}

unsafe impl Send for Task {}
unsafe impl Sync for Task {}

impl Task {
    /// Creates a child task registered under `scope`.
    ///
    /// The child's scope stack is seeded with the registering scope, so an
    /// `async_` spawned inside this task with no intervening `finish` joins
    /// the nearest enclosing scope.
    pub(crate) fn child<F>(body: F, scope: Arc<FinishScope>, injector: InjectorHandle) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            body: UnsafeCell::new(Box::pin(body)),
            state: AtomicUsize::new(READY),
            scopes: Mutex::new(vec![scope.clone()]),
            completion: Completion::Scope(scope),
            failure: Mutex::new(None),
            injector,
        }
    }

    /// Creates the root task of a `launch` call.
    ///
    /// The root has no registering scope; its terminal transition is
    /// reported through the one-shot `signal` instead.
    pub(crate) fn root<F>(
        body: F,
        signal: Sender<Result<(), Box<dyn Any + Send>>>,
        injector: InjectorHandle,
    ) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            body: UnsafeCell::new(Box::pin(body)),
            state: AtomicUsize::new(READY),
            scopes: Mutex::new(Vec::new()),
            completion: Completion::Root(Mutex::new(Some(signal))),
            failure: Mutex::new(None),
            injector,
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Performs one dispatch of the task.
    ///
    /// Transitions READY → RUNNING, polls the body once, and resolves the
    /// result:
    /// - completion → COMPLETED,
    /// - panic → FAILED with the payload captured,
    /// - yield → WAITING, unless a wake arrived mid-poll (NOTIFIED), in
    ///   which case the task goes straight back to the ready queue.
    ///
    /// Running a task in any other state is a defensive no-op; in correct
    /// operation a task is queued exactly once per READY transition.
    pub(crate) fn run(self: Arc<Self>) -> RunOutcome {
        let current = self.state.load(Ordering::Acquire);

        if current != READY {
            return RunOutcome::Skipped;
        }

        if self
            .state
            .compare_exchange(READY, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return RunOutcome::Skipped;
        }

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Install this task as the thread's current task for the duration
        // of the poll; the constructs called inside the body look it up
        // there. The slot is restored afterwards, so nothing keyed by the
        // OS thread survives a suspension.
        let poll = CURRENT_TASK.with(|cell| {
            let previous = cell.replace(Some(self.clone()));

            // Safety: the RUNNING state guarantees that no other thread is
            // polling this body.
            let result = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
                (&mut *self.body.get()).as_mut().poll(&mut cx)
            }));

            cell.replace(previous);

            result
        });

        match poll {
            Ok(Poll::Ready(())) => {
                self.state.store(COMPLETED, Ordering::Release);
                trace!(task = self.id, "task completed");

                RunOutcome::Completed
            }

            Err(payload) => {
                *self.failure.lock().unwrap() = Some(payload);
                self.state.store(FAILED, Ordering::Release);
                trace!(task = self.id, "task failed");

                RunOutcome::Failed
            }

            Ok(Poll::Pending) => {
                // Park unless a wake arrived during the poll (NOTIFIED), in
                // which case the scope already drained and the task must go
                // straight back to the queue.
                if self
                    .state
                    .compare_exchange(RUNNING, WAITING, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    trace!(task = self.id, "task suspended");

                    RunOutcome::Suspended
                } else {
                    self.state.store(READY, Ordering::Release);
                    self.injector.push(self.clone());
                    trace!(task = self.id, "task woken mid-poll, re-queued");

                    RunOutcome::Resumed
                }
            }
        }
    }

    /// Signals the task to resume after one of its scopes drained.
    ///
    /// A WAITING task moves to READY and is re-queued. A task that is still
    /// RUNNING (it has not finished yielding yet) is marked NOTIFIED so the
    /// wake is not lost; every other state needs no action.
    pub(crate) fn wake(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                WAITING => {
                    if self
                        .state
                        .compare_exchange(WAITING, READY, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        trace!(task = self.id, "task resumed");
                        self.injector.push(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                // Already queued, notified, or finished; nothing to do.
                _ => return,
            }
        }
    }

    /// Reports the terminal transition recorded by the last `run`.
    ///
    /// Called exactly once, by the worker that observed the terminal
    /// outcome: decrements the registering scope's pending count (carrying
    /// the failure payload, if any), or signals the `launch` caller for the
    /// root task.
    pub(crate) fn retire(&self) {
        let failure = self.failure.lock().unwrap().take();

        match &self.completion {
            Completion::Scope(scope) => scope.child_finished(failure),
            Completion::Root(signal) => {
                let signal = signal
                    .lock()
                    .unwrap()
                    .take()
                    .expect("root task retired twice");

                let result = match failure {
                    Some(payload) => Err(payload),
                    None => Ok(()),
                };

                let _ = signal.send(result);
            }
        }
    }

    /// Pushes a new innermost finish scope onto the task's stack.
    pub(crate) fn push_scope(&self, scope: Arc<FinishScope>) {
        self.scopes.lock().unwrap().push(scope);
    }

    /// Pops the innermost finish scope.
    pub(crate) fn pop_scope(&self) {
        self.scopes
            .lock()
            .unwrap()
            .pop()
            .expect("finish scope stack underflow");
    }

    /// Returns the innermost finish scope, if any.
    pub(crate) fn innermost_scope(&self) -> Option<Arc<FinishScope>> {
        self.scopes.lock().unwrap().last().cloned()
    }
}
