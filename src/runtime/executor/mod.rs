mod worker;

pub(crate) mod core;

pub(crate) use self::core::Executor;
