pub(crate) mod injector;
pub(crate) mod queue;
