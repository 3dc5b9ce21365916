//! Filter behavior for pipes

use crate::error::PipesError;
use sluice::{PipeBehavior, PipeComponent, PipeFuture, Resolution};
use std::fmt::Debug;
use std::marker::PhantomData;

/// A behavior that only admits items matching a predicate
///
/// Rejected items are vetoed: the `add` call settles without emitting `add`,
/// so nothing is forwarded downstream. Removals always pass.
pub struct FilterPipe<T, F>
where
    F: Fn(&T) -> bool,
{
    predicate: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, F> FilterPipe<T, F>
where
    F: Fn(&T) -> bool,
{
    /// Creates a new filter with the given predicate
    #[must_use]
    pub const fn new(predicate: F) -> Self {
        Self {
            predicate,
            _phantom: PhantomData,
        }
    }
}

impl<T, F> PipeComponent for FilterPipe<T, F>
where
    T: Clone + Debug + Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    type Item = T;
    type Error = PipesError;
}

impl<T, F> PipeBehavior for FilterPipe<T, F>
where
    T: Clone + Debug + Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn add_filter(&self, item: Self::Item) -> PipeFuture<'_, Resolution<Self::Item>, Self::Error> {
        let resolution = if (self.predicate)(&item) {
            Resolution::item(item)
        } else {
            tracing::debug!(?item, "Item rejected by filter");
            Resolution::Veto
        };
        Box::pin(async move { Ok(resolution) })
    }
}
