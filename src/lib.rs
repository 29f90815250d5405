//! # fjord
//!
//! **fjord** is a structured fork-join runtime for Rust, built around the
//! async/finish model of parallelism.
//!
//! Programs are decomposed with three constructs: [`async_`] spawns a child
//! task that runs independently, [`finish`] establishes a join barrier that
//! waits for every task transitively spawned within it, and [`launch`] runs
//! one application to completion on a fixed pool of worker threads.
//!
//! The defining property of the runtime is that a task waiting at the end of
//! a `finish` scope suspends *without blocking its worker thread*: the worker
//! moves on to other ready tasks, and the waiting task is re-queued when the
//! last of its children completes. The degree of parallelism therefore stays
//! fixed no matter how deeply the program nests.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fjord::{async_, finish, launch};
//!
//! launch(async {
//!     finish(async {
//!         async_(async { /* runs in parallel */ });
//!         async_(async { /* runs in parallel */ });
//!     })
//!     .await;
//!     // both children are done here
//! })
//! .unwrap();
//! ```
//!
//! ## Notes
//!
//! - Sibling tasks may run in any order; the only ordering guarantee is the
//!   `finish` join.
//! - A panicking task body marks the task failed; the failure is re-raised
//!   when its enclosing `finish` resumes and ultimately surfaces as an
//!   [`Error`] from [`launch`].
//! - There is no cancellation: every spawned task runs to completion or
//!   failure.

mod error;
mod runtime;

pub mod constructs;

pub use constructs::{async_, finish, launch};
pub use error::Error;
pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
