use super::Runtime;
use crate::error::Error;

use std::thread;

/// Builder for [`Runtime`] instances.
///
/// The worker count defaults to the available hardware parallelism.
pub struct RuntimeBuilder {
    worker_threads: usize,
}

impl RuntimeBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self { worker_threads }
    }

    /// Sets the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Builds the runtime, starting its worker pool.
    pub fn build(self) -> Runtime {
        Runtime::new(self.worker_threads)
    }

    /// Builds a runtime, runs `body` as its application, and tears the
    /// runtime down before returning.
    ///
    /// See [`Runtime::launch`] for the completion and error semantics.
    pub fn launch<F>(self, body: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.build().launch(body)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
