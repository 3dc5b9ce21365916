//! In-memory collection behavior

use crate::error::{PipesError, Result};
use sluice::{Downstream, PipeBehavior, PipeComponent, PipeFuture, Resolution};
use std::fmt::Debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error};

/// Event emitted when an item already in the collection is added again.
pub const UPDATE: &str = "update";

/// A behavior that keeps the items it admits, in insertion order
///
/// * Adding a new item stores it and emits `add`.
/// * Adding an item that is already stored replaces it and emits [`UPDATE`]
///   instead, so it is not forwarded downstream a second time.
/// * Removing a stored item drops it and emits `remove`; removing an unknown
///   item is vetoed.
/// * Piping the collection into a downstream replays every stored item.
pub struct CollectionPipe<T> {
    items: RwLock<Vec<T>>,
}

impl<T> CollectionPipe<T>
where
    T: Clone + PartialEq,
{
    /// Creates an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Creates a collection that already holds `items`
    #[must_use]
    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut stored: Vec<T> = Vec::new();
        for item in items {
            if !stored.contains(&item) {
                stored.push(item);
            }
        }
        Self {
            items: RwLock::new(stored),
        }
    }

    /// Snapshot of the stored items
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock was poisoned
    pub fn items(&self) -> Result<Vec<T>> {
        Ok(self.read()?.clone())
    }

    /// Number of stored items
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock was poisoned
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Whether the collection is empty
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock was poisoned
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Whether `item` is stored
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock was poisoned
    pub fn contains(&self, item: &T) -> Result<bool> {
        Ok(self.read()?.contains(item))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>> {
        self.items
            .read()
            .map_err(|e| PipesError::Store(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>> {
        self.items
            .write()
            .map_err(|e| PipesError::Store(e.to_string()))
    }

    fn store(&self, item: T) -> Result<Resolution<T>> {
        let mut items = self.write()?;
        match items.iter_mut().find(|stored| **stored == item) {
            Some(stored) => {
                *stored = item.clone();
                Ok(Resolution::item(item).with_event(UPDATE))
            }
            None => {
                items.push(item.clone());
                Ok(Resolution::item(item))
            }
        }
    }

    fn discard(&self, item: T) -> Result<Resolution<T>> {
        let mut items = self.write()?;
        match items.iter().position(|stored| *stored == item) {
            Some(index) => Ok(Resolution::item(items.remove(index))),
            None => Ok(Resolution::Veto),
        }
    }
}

impl<T> Default for CollectionPipe<T>
where
    T: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PipeComponent for CollectionPipe<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    type Item = T;
    type Error = PipesError;
}

impl<T> PipeBehavior for CollectionPipe<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    fn add(&self, item: Self::Item) -> PipeFuture<'_, Resolution<Self::Item>, Self::Error> {
        let resolution = self.store(item);
        Box::pin(async move { resolution })
    }

    fn remove(&self, item: Self::Item) -> PipeFuture<'_, Resolution<Self::Item>, Self::Error> {
        let resolution = self.discard(item);
        Box::pin(async move { resolution })
    }

    fn on_pipe(&self, downstream: &dyn Downstream<Self::Item>) {
        let items = match self.items() {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to replay collection: {e}");
                return;
            }
        };
        debug!(count = items.len(), downstream = %downstream.label(), "Replaying collection");
        for item in items {
            downstream.add(item);
        }
    }
}
