use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    UseCase,
    computation::Emitter,
    executor::{CompletionContext, WorkerContext},
    subscription::{Subscription, SubscriptionGroup},
};

/// One hand-off from the worker side to the completion side.
#[derive(Debug)]
pub enum Event<T, E> {
    Started,
    Next(T),
    Failed(E),
    Completed,
}

/// The four optional observers for one `execute` call. Absent callbacks are
/// skipped silently.
pub struct Callbacks<T, E> {
    on_start: Option<Box<dyn FnOnce() + Send>>,
    on_next: Option<Box<dyn FnMut(T) + Send>>,
    on_error: Option<Box<dyn FnOnce(E) + Send>>,
    on_complete: Option<Box<dyn FnOnce() + Send>>,
}

impl<T, E> Callbacks<T, E> {
    pub fn new() -> Self {
        Self {
            on_start: None,
            on_next: None,
            on_error: None,
            on_complete: None,
        }
    }

    pub fn on_start(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_next(mut self, f: impl FnMut(T) + Send + 'static) -> Self {
        self.on_next = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(E) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

/// Completion-side half of one execution: owns the callbacks and re-checks
/// the subscription before every invocation.
pub(crate) struct Sink<T, E> {
    subscription: Subscription,
    callbacks: Mutex<Callbacks<T, E>>,
    completion: Arc<dyn CompletionContext>,
}

impl<T, E> Sink<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn new(
        subscription: Subscription,
        callbacks: Callbacks<T, E>,
        completion: Arc<dyn CompletionContext>,
    ) -> Arc<Self> {
        Arc::new(Self {
            subscription,
            callbacks: Mutex::new(callbacks),
            completion,
        })
    }

    pub(crate) fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Worker-side checkpoint: events for settled subscriptions are dropped
    /// here, the rest are handed to the completion context.
    pub(crate) fn push(self: &Arc<Self>, event: Event<T, E>) {
        if !self.subscription.is_active() {
            tracing::trace!("dropping event for settled subscription");
            return;
        }
        let sink = Arc::clone(self);
        self.completion.dispatch(Box::new(move || sink.deliver(event)));
    }

    /// Completion-side checkpoint: the subscription state decides whether a
    /// callback still runs; terminal events must claim the state first.
    fn deliver(&self, event: Event<T, E>) {
        match event {
            Event::Started => {
                if !self.subscription.is_active() {
                    return;
                }
                if let Some(on_start) = self.callbacks.lock().on_start.take() {
                    on_start();
                }
            }
            Event::Next(value) => {
                if !self.subscription.is_active() {
                    return;
                }
                if let Some(on_next) = self.callbacks.lock().on_next.as_mut() {
                    on_next(value);
                }
            }
            Event::Failed(error) => {
                if !self.subscription.fail() {
                    return;
                }
                if let Some(on_error) = self.callbacks.lock().on_error.take() {
                    on_error(error);
                }
            }
            Event::Completed => {
                if !self.subscription.complete() {
                    return;
                }
                if let Some(on_complete) = self.callbacks.lock().on_complete.take() {
                    on_complete();
                }
            }
        }
    }
}

/// Runs a use case's computations on a worker context, delivering results
/// on a completion context, with bulk cancellation.
///
/// Owns exactly one [`SubscriptionGroup`] for its whole lifetime; the two
/// contexts are shared and never torn down here.
pub struct Interactor<U: UseCase> {
    use_case: U,
    worker: Arc<dyn WorkerContext>,
    completion: Arc<dyn CompletionContext>,
    subscriptions: SubscriptionGroup,
}

impl<U: UseCase> Interactor<U> {
    pub fn new(
        use_case: U,
        worker: Arc<dyn WorkerContext>,
        completion: Arc<dyn CompletionContext>,
    ) -> Self {
        Self {
            use_case,
            worker,
            completion,
            subscriptions: SubscriptionGroup::new(),
        }
    }

    /// Schedules one execution and returns immediately.
    ///
    /// Per call: `on_start`, then zero or more `on_next` in production
    /// order, then exactly one of `on_error`/`on_complete`. After
    /// [`dispose`](Self::dispose) this is a no-op and no callback ever
    /// fires.
    pub fn execute(&self, params: U::Params, callbacks: Callbacks<U::Output, U::Error>) {
        let subscription = Subscription::new();
        let Some(registration) = self.subscriptions.add(subscription.clone()) else {
            tracing::debug!("execute on a disposed interactor, nothing scheduled");
            return;
        };
        let computation = self.use_case.computation(params);
        let sink = Sink::new(subscription.clone(), callbacks, Arc::clone(&self.completion));

        self.worker.schedule(Box::pin(async move {
            if subscription.is_active() {
                sink.push(Event::Started);
                let emitter = Emitter::new(Arc::clone(&sink));
                match computation.run(emitter).await {
                    Ok(()) => sink.push(Event::Completed),
                    Err(error) => sink.push(Event::Failed(error)),
                }
            }
            registration.deregister();
        }));
    }

    /// Cancels every outstanding execution and refuses future ones.
    /// Idempotent.
    pub fn dispose(&self) {
        self.subscriptions.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.subscriptions.is_disposed()
    }
}
