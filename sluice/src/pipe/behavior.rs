use super::component::PipeComponent;
use super::downstream::Downstream;
use super::types::{PipeFuture, Resolution};
use std::convert::Infallible;
use std::fmt::Debug;
use std::marker::PhantomData;

/// The overridable steps of a pipe.
///
/// Every hook has a pass-through default, so a behavior only implements the
/// steps it cares about. `add_filter` decides admission, `add` and `remove`
/// perform the side effect, `on_pipe` runs once when a downstream is attached.
pub trait PipeBehavior: PipeComponent + Send + Sync + 'static {
    fn add_filter(&self, item: Self::Item) -> PipeFuture<'_, Resolution<Self::Item>, Self::Error> {
        Box::pin(async move { Ok(Resolution::item(item)) })
    }

    fn add(&self, item: Self::Item) -> PipeFuture<'_, Resolution<Self::Item>, Self::Error> {
        Box::pin(async move { Ok(Resolution::item(item)) })
    }

    fn remove(&self, item: Self::Item) -> PipeFuture<'_, Resolution<Self::Item>, Self::Error> {
        Box::pin(async move { Ok(Resolution::item(item)) })
    }

    fn on_pipe(&self, _downstream: &dyn Downstream<Self::Item>) {}
}

/// A behavior that keeps every default: items pass straight through.
pub struct Passthrough<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Passthrough<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for Passthrough<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PipeComponent for Passthrough<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    type Item = T;
    type Error = Infallible;
}

impl<T> PipeBehavior for Passthrough<T> where T: Clone + Debug + Send + Sync + 'static {}
