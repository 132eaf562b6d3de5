#[cfg(feature = "tokio")]
pub mod impl_tokio;

use std::pin::Pin;

pub type WorkerJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

pub type CompletionJob = Box<dyn FnOnce() + Send + 'static>;

/// Runs scheduled work off the caller's execution context.
pub trait WorkerContext: Send + Sync + 'static {
    fn schedule(&self, job: WorkerJob);
}

/// Runs scheduled work on the designated destination context.
///
/// Implementations must run jobs in dispatch order, one at a time.
pub trait CompletionContext: Send + Sync + 'static {
    fn dispatch(&self, job: CompletionJob);
}
