pub mod computation;
pub mod executor;
pub mod interactor;
pub mod mapper;
pub mod subscription;

pub use computation::{Cancelled, Computation, Emitter};
pub use interactor::{Callbacks, Event, Interactor};
pub use mapper::DualMapper;
pub use subscription::{Outcome, Subscription, SubscriptionGroup};

/// A single unit of asynchronous business logic.
///
/// A use case only describes how to build its result sequence; scheduling,
/// delivery and cancellation are the [`Interactor`]'s job.
pub trait UseCase: 'static {
    type Params;
    type Output: Send + 'static;
    type Error: Send + 'static;

    /// Builds the computation for one execution. The computation is lazy:
    /// building it performs no work until it is driven on the worker context.
    fn computation(&self, params: Self::Params) -> Computation<Self::Output, Self::Error>;
}
