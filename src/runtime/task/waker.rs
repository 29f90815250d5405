use crate::runtime::task::Task;

use std::mem;
use std::sync::Arc;
use std::task::{RawWaker, RawWakerVTable, Waker};

static VTABLE: RawWakerVTable =
    RawWakerVTable::new(clone_raw, wake_raw, wake_by_ref_raw, drop_raw);

/// Builds a `Waker` that re-queues the given task when woken.
///
/// The waker holds an `Arc<Task>`; waking it drives the task's
/// WAITING → READY transition (see [`Task::wake`]).
pub(crate) fn make_waker(task: Arc<Task>) -> Waker {
    unsafe { Waker::from_raw(RawWaker::new(Arc::into_raw(task) as *const (), &VTABLE)) }
}

fn clone_raw(ptr: *const ()) -> RawWaker {
    let arc = unsafe { Arc::from_raw(ptr as *const Task) };
    let cloned = arc.clone();
    mem::forget(arc);

    RawWaker::new(Arc::into_raw(cloned) as *const (), &VTABLE)
}

fn wake_raw(ptr: *const ()) {
    let arc = unsafe { Arc::from_raw(ptr as *const Task) };
    arc.wake();
}

fn wake_by_ref_raw(ptr: *const ()) {
    let arc = unsafe { Arc::from_raw(ptr as *const Task) };
    arc.clone().wake();
    mem::forget(arc);
}

fn drop_raw(ptr: *const ()) {
    unsafe { drop(Arc::from_raw(ptr as *const Task)) };
}
