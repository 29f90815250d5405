use std::any::Any;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use tracing::trace;

/// Join context created by a `finish` call.
///
/// A scope tracks the number of child tasks registered under it that have
/// not yet reached a terminal state. The owning task joins the scope by
/// awaiting [`ScopeJoin`]; the single decrement that drains the count to
/// zero wakes the owner.
///
/// Registration is a pure counter relationship: a child never needs to
/// locate its parent task, only the scope it decrements.
pub(crate) struct FinishScope {
    /// Number of registered children not yet completed or failed.
    ///
    /// Modified only by `register_child` (increment) and `child_finished`
    /// (decrement); draining below zero is a fatal invariant violation.
    pending: AtomicUsize,

    /// Waker of the owning task, installed while the owner is joining.
    waiter: Mutex<Option<Waker>>,

    /// First failure captured from a child registered under this scope.
    failure: Mutex<Option<Box<dyn Any + Send>>>,
}

impl FinishScope {
    /// Creates an empty scope with no outstanding children.
    pub(crate) fn new() -> Self {
        Self {
            pending: AtomicUsize::new(0),
            waiter: Mutex::new(None),
            failure: Mutex::new(None),
        }
    }

    /// Registers a new child task under this scope.
    ///
    /// Called by `async_` before the child is enqueued, so the count can
    /// never be observed low by the joining owner.
    pub(crate) fn register_child(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    /// Records the terminal transition of a registered child.
    ///
    /// A failed child carries its panic payload; the first failure to reach
    /// the scope is retained, later ones are dropped. The failure is
    /// installed before the decrement, so the owner always observes it once
    /// the join completes.
    ///
    /// Exactly one call across all concurrent children observes the count
    /// reaching zero; that call takes the owner's waker (if the owner has
    /// already registered it) and wakes the owner.
    pub(crate) fn child_finished(&self, failure: Option<Box<dyn Any + Send>>) {
        if let Some(payload) = failure {
            let mut slot = self.failure.lock().unwrap();

            if slot.is_none() {
                *slot = Some(payload);
            }
        }

        let previous = self.pending.fetch_sub(1, Ordering::AcqRel);
        assert!(previous > 0, "finish scope pending count underflow");

        if previous == 1 {
            trace!("finish scope drained");

            if let Some(waker) = self.waiter.lock().unwrap().take() {
                waker.wake();
            }
        }
    }

    /// Takes the first captured child failure, if any.
    pub(crate) fn take_failure(&self) -> Option<Box<dyn Any + Send>> {
        self.failure.lock().unwrap().take()
    }
}

/// Future that completes once the scope's pending count drains to zero.
///
/// Awaited by `finish` after running its body: if no children are
/// outstanding it completes immediately, otherwise the owning task yields
/// and is woken by the draining decrement.
pub(crate) struct ScopeJoin {
    pub(crate) scope: Arc<FinishScope>,
}

impl Future for ScopeJoin {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // Install the waker before reading the count, so a concurrent
        // draining decrement either sees the waker or we see the zero.
        *self.scope.waiter.lock().unwrap() = Some(cx.waker().clone());

        if self.scope.pending.load(Ordering::Acquire) == 0 {
            self.scope.waiter.lock().unwrap().take();

            return Poll::Ready(());
        }

        Poll::Pending
    }
}
