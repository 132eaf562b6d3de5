use std::{pin::Pin, sync::Arc};

use derive_more::Display;

use crate::interactor::{Event, Sink};

/// Emission refused: the subscription is no longer active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("subscription cancelled")]
pub struct Cancelled;

impl std::error::Error for Cancelled {}

/// Worker-side production point for one execution.
///
/// Not `Clone`: a single producer keeps delivery in production order.
pub struct Emitter<T, E> {
    sink: Arc<Sink<T, E>>,
}

impl<T, E> Emitter<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn new(sink: Arc<Sink<T, E>>) -> Self {
        Self { sink }
    }

    /// Hands one value to the completion context.
    ///
    /// Fails once the subscription is cancelled; producers treat that as a
    /// stop signal.
    pub fn emit(&self, value: T) -> Result<(), Cancelled> {
        if !self.sink.subscription().is_active() {
            return Err(Cancelled);
        }
        self.sink.push(Event::Next(value));
        Ok(())
    }

    pub fn is_cancelled(&self) -> bool {
        self.sink.subscription().is_cancelled()
    }
}

type Producing<E> = Pin<Box<dyn Future<Output = Result<(), E>> + Send + 'static>>;

/// A lazy, possibly multi-valued asynchronous result sequence.
///
/// Building one performs no work; the producer runs only when the engine
/// drives it on the worker context. Returning `Ok(())` completes the
/// sequence, `Err(e)` fails it after whatever was emitted.
pub struct Computation<T, E> {
    produce: Box<dyn FnOnce(Emitter<T, E>) -> Producing<E> + Send + 'static>,
}

impl<T, E> Computation<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new<F, Fut>(produce: F) -> Self
    where
        F: FnOnce(Emitter<T, E>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        Self {
            produce: Box::new(move |emitter| Box::pin(produce(emitter))),
        }
    }

    /// Emits a single value, then completes.
    pub fn just(value: T) -> Self {
        Self::new(move |emitter| async move {
            let _ = emitter.emit(value);
            Ok(())
        })
    }

    /// Emits every item in order, then completes.
    pub fn from_iter<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T> + Send + 'static,
    {
        Self::new(move |emitter| async move {
            for value in values {
                if emitter.emit(value).is_err() {
                    break;
                }
            }
            Ok(())
        })
    }

    /// Completes without emitting.
    pub fn empty() -> Self {
        Self::new(|_| async { Ok(()) })
    }

    /// Fails immediately. Also the representation of a use case whose
    /// construction itself failed.
    pub fn fail(error: E) -> Self {
        Self::new(move |_| async move { Err(error) })
    }

    pub(crate) fn run(self, emitter: Emitter<T, E>) -> Producing<E> {
        (self.produce)(emitter)
    }
}

#[cfg(feature = "futures-util")]
impl<T, E> Computation<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Drives a stream to completion, emitting `Ok` items and failing on
    /// the first `Err`.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: futures_util::Stream<Item = Result<T, E>> + Send + 'static,
    {
        use futures_util::StreamExt;

        Self::new(move |emitter| async move {
            futures_util::pin_mut!(stream);
            while let Some(item) = stream.next().await {
                match item {
                    Ok(value) => {
                        if emitter.emit(value).is_err() {
                            break;
                        }
                    }
                    Err(error) => return Err(error),
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn test_building_performs_no_work() {
        let touched = Arc::new(AtomicBool::new(false));
        let probe = Arc::clone(&touched);
        let _computation: Computation<i32, ()> = Computation::new(move |_emitter| {
            probe.store(true, Ordering::SeqCst);
            async { Ok(()) }
        });
        assert!(!touched.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cancelled_is_an_error() {
        let err: Box<dyn std::error::Error> = Box::new(Cancelled);
        assert_eq!(err.to_string(), "subscription cancelled");
    }
}
