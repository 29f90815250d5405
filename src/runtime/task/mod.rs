pub(crate) mod state;
pub(crate) mod waker;

mod core;

pub(crate) use self::core::{RunOutcome, Task};
