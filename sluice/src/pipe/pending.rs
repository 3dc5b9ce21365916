use super::types::Settled;
use crate::error::PipeError;
use futures::{ready, FutureExt};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Handle to an in-flight `add` or `remove`.
///
/// Returned before the operation's hooks have run. Await it to observe the
/// outcome; dropping it detaches the operation, which still runs to completion.
#[derive(Debug)]
pub struct Pending<T, E> {
    handle: JoinHandle<Result<Settled<T>, PipeError<E>>>,
}

impl<T, E> Pending<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub(crate) fn spawn<F>(operation: F) -> Self
    where
        F: Future<Output = Result<Settled<T>, PipeError<E>>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(operation),
        }
    }
}

impl<T, E> Pending<T, E> {
    /// Whether the operation has settled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T, E> Future for Pending<T, E> {
    type Output = Result<Settled<T>, PipeError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let joined = ready!(self.handle.poll_unpin(cx));
        Poll::Ready(joined.unwrap_or_else(|e| Err(PipeError::Aborted(e.to_string()))))
    }
}
