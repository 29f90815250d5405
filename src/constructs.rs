//! Program-facing parallelism constructs.
//!
//! The two core constructs are `finish` and `async_`, which translate the
//! structured nesting of calls into task-graph operations:
//!
//! ```rust,ignore
//! finish(async {
//!     async_(async { /* ... */ });
//!     // ...
//!     async_(async { /* ... */ });
//! })
//! .await;
//! ```
//!
//! Each `async_` body is wrapped in a task that any worker thread may
//! execute; `finish` waits for every child (and every task those children
//! transitively spawn) to complete before returning. The constructs nest
//! freely, supporting arbitrarily deep structures of parallelism.
//!
//! [`launch`] is the blocking entry point that runs one such application on
//! a worker pool.

use crate::error::Error;
use crate::runtime::builder::RuntimeBuilder;
use crate::runtime::context::{self, CURRENT_INJECTOR, CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::runtime::scope::{FinishScope, ScopeJoin};
use crate::runtime::task::Task;

use std::panic;
use std::sync::Arc;

use tracing::trace;

/// Runs one application on a freshly built runtime, blocking the caller
/// until every task spawned by `body` has completed.
///
/// The worker pool is sized to the available hardware parallelism and torn
/// down before this function returns; use [`RuntimeBuilder`] to configure
/// the pool instead.
///
/// # Errors
///
/// Returns [`Error::TaskFailed`] when the body, or any task transitively
/// spawned under it, panics; the first captured failure wins.
pub fn launch<F>(body: F) -> Result<(), Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    RuntimeBuilder::new().launch(body)
}

/// Spawns `body` as an independent child task.
///
/// The child registers with the innermost enclosing finish scope of the
/// calling task — explicit, or the implicit scope every task executes
/// under — and is enqueued for any worker to pick up. The call returns
/// immediately; the spawning task never waits here.
///
/// Sibling tasks may be interleaved arbitrarily; the only join point is the
/// enclosing [`finish`].
///
/// # Panics
///
/// Panics if called outside a running task: spawning requires an active
/// runtime and an enclosing finish scope.
pub fn async_<F>(body: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let task =
        context::current_task().expect("async_ must be called from within a running task");

    let scope = task
        .innermost_scope()
        .expect("async_ must execute under an enclosing finish scope");

    // Register before the child can possibly run, so the scope's count
    // never reads low.
    scope.register_child();

    let injector = CURRENT_INJECTOR.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("no injector in the runtime context")
            .clone()
    });

    let child = Arc::new(Task::child(body, scope, injector.clone()));
    trace!(parent = task.id(), child = child.id(), "spawned async child");

    // Prefer the current worker's local queue for cache locality.
    let pushed_locally = CURRENT_WORKER_ID.with(|id_cell| {
        let id = *id_cell.borrow();
        if let Some(id) = id {
            CURRENT_LOCALS.with(|locals_cell| {
                if let Some(locals) = locals_cell.borrow().as_ref() {
                    locals[id].push(child.clone());
                    return true;
                }
                false
            })
        } else {
            false
        }
    });

    // Fallback to the global injector.
    if !pushed_locally {
        injector.push(child);
    }
}

/// Runs `body`, then waits until every task transitively spawned inside it
/// has reached a terminal state.
///
/// Instructions in the body execute in order on the current task; only
/// `async_` calls fork off independent work. When the body is done and
/// children are still outstanding, the *task* suspends — the worker thread
/// is released to run other ready tasks — and resumes at this point once
/// the last child completes.
///
/// If a task in the scope's subtree failed, the first captured failure is
/// re-raised here once all siblings have finished, so it propagates up the
/// enclosing scopes to [`launch`] (the behavior of `std::thread::scope`).
///
/// # Panics
///
/// Panics if awaited outside a running task.
pub async fn finish<F>(body: F)
where
    F: Future<Output = ()>,
{
    let task =
        context::current_task().expect("finish must be called from within a running task");

    let scope = Arc::new(FinishScope::new());
    task.push_scope(scope.clone());

    trace!(task = task.id(), "entering finish scope");
    body.await;

    // Code after the scope sees the previous scope as innermost again.
    // The captured handle still points at the right task even if the body
    // suspended and resumed on a different worker thread.
    task.pop_scope();

    ScopeJoin {
        scope: scope.clone(),
    }
    .await;

    trace!(task = task.id(), "finish scope joined");

    if let Some(payload) = scope.take_failure() {
        panic::resume_unwind(payload);
    }
}
