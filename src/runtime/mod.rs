//! Core runtime components.
//!
//! This module contains the building blocks of the fork-join runtime:
//! the task state machine, finish scopes, the work-stealing executor,
//! and the per-poll runtime context.
//!
//! Programs normally interact with the [`constructs`](crate::constructs)
//! API rather than with these components directly.

mod core;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod executor;
pub(crate) mod scope;
pub(crate) mod task;
pub(crate) mod work_stealing;

pub use self::core::Runtime;
