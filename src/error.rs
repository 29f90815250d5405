use std::any::Any;

use thiserror::Error;

/// Errors surfaced to the caller of [`launch`](crate::launch).
///
/// Scheduling-invariant violations (calling a construct outside a running
/// task, draining a scope below zero) are programming errors and panic
/// instead of being reported here.
#[derive(Debug, Error)]
pub enum Error {
    /// The runtime instance is already driving a top-level application.
    #[error("runtime is already running an application")]
    AlreadyLaunched,

    /// The root task, or one of the tasks transitively spawned under it,
    /// failed. Carries the rendered panic message of the first captured
    /// failure.
    #[error("task failed: {0}")]
    TaskFailed(String),
}

/// Renders a captured panic payload into a human-readable message.
///
/// Panic payloads are `&str` or `String` for the overwhelmingly common
/// `panic!` forms; anything else is reported opaquely.
pub(crate) fn render_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task body panicked".to_string()
    }
}
