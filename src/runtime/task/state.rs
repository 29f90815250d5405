/// Task is queued and eligible to run.
///
/// A task holds this state only between being pushed onto a ready queue
/// and being picked up by a worker.
pub(crate) const READY: usize = 0;

/// Task is currently being executed by a worker.
///
/// At most one worker may observe this state at a time.
pub(crate) const RUNNING: usize = 1;

/// Task has yielded, waiting for one of its finish scopes to drain.
///
/// The task is parked and not queued anywhere; the decrement that moves
/// the scope's pending count to zero re-queues it.
pub(crate) const WAITING: usize = 2;

/// Task was woken while still running.
///
/// The wake arrived before the task finished yielding (a child drained the
/// scope while the owner was still inside its poll). The task is re-queued
/// immediately once its poll returns instead of parking.
pub(crate) const NOTIFIED: usize = 3;

/// Task body ran to completion.
pub(crate) const COMPLETED: usize = 4;

/// Task body panicked; the payload is captured on the task.
pub(crate) const FAILED: usize = 5;
