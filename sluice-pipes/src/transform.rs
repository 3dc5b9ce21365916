//! Transform behavior for pipes

use crate::error::PipesError;
use sluice::{PipeBehavior, PipeComponent, PipeFuture, Resolution};
use std::fmt::Debug;
use std::marker::PhantomData;

/// A behavior that rewrites every admitted item before it is added
///
/// The transform runs in the filter stage, so the `add` event and everything
/// downstream see the rewritten item. Removals are forwarded unchanged.
pub struct TransformPipe<T, F>
where
    F: Fn(T) -> T,
{
    transform: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, F> TransformPipe<T, F>
where
    F: Fn(T) -> T,
{
    /// Creates a new transform with the given transformation function
    #[must_use]
    pub const fn new(transform: F) -> Self {
        Self {
            transform,
            _phantom: PhantomData,
        }
    }
}

impl<T, F> PipeComponent for TransformPipe<T, F>
where
    T: Clone + Debug + Send + Sync + 'static,
    F: Fn(T) -> T + Send + Sync + 'static,
{
    type Item = T;
    type Error = PipesError;
}

impl<T, F> PipeBehavior for TransformPipe<T, F>
where
    T: Clone + Debug + Send + Sync + 'static,
    F: Fn(T) -> T + Send + Sync + 'static,
{
    fn add_filter(&self, item: Self::Item) -> PipeFuture<'_, Resolution<Self::Item>, Self::Error> {
        let output = (self.transform)(item);
        Box::pin(async move { Ok(Resolution::item(output)) })
    }
}
