//! Named publish/subscribe channel that pipes compose with.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

/// Emitted synchronously when `add` is called.
pub const ADDING: &str = "adding";
/// Default completion event of `add`.
pub const ADD: &str = "add";
/// Emitted synchronously when `remove` is called.
pub const REMOVING: &str = "removing";
/// Default completion event of `remove`.
pub const REMOVE: &str = "remove";
/// Carries failed operations on a pipe's error channel.
pub const ERROR: &str = "error";

type Handler<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Token returned by [`Events::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: String,
    id: u64,
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }
}

struct Registration<T> {
    id: u64,
    handler: Handler<T>,
}

/// Handlers keyed by event name, run in registration order.
pub struct Events<T> {
    handlers: RwLock<HashMap<String, Vec<Registration<T>>>>,
    next_id: AtomicU64,
}

impl<T: 'static> Events<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers `handler` for `event` and returns `self` for chaining.
    pub fn on<F>(&self, event: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe(event, handler);
        self
    }

    /// Registers `handler` for `event` and returns a token for [`Events::off`].
    pub fn subscribe<F>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(
            event.into(),
            Arc::new(move |item: &T| {
                handler(item);
                true
            }),
        )
    }

    /// Removes a handler. Returns `false` if it was already gone.
    pub fn off(&self, subscription: &Subscription) -> bool {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(registered) = handlers.get_mut(&subscription.event) else {
            return false;
        };
        let before = registered.len();
        registered.retain(|r| r.id != subscription.id);
        before != registered.len()
    }

    /// Runs every handler registered for `event` with `item`.
    ///
    /// The handler table is not locked while handlers run, so a handler may
    /// subscribe further handlers; those only see later triggers.
    pub fn trigger(&self, event: &str, item: &T) {
        let snapshot: Vec<(u64, Handler<T>)> = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            match handlers.get(event) {
                Some(registered) => registered
                    .iter()
                    .map(|r| (r.id, Arc::clone(&r.handler)))
                    .collect(),
                None => return,
            }
        };
        trace!(event, handlers = snapshot.len(), "Triggering event");

        let closed: Vec<u64> = snapshot
            .into_iter()
            .filter_map(|(id, handler)| (!handler(item)).then_some(id))
            .collect();
        if !closed.is_empty() {
            let mut handlers = self
                .handlers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(registered) = handlers.get_mut(event) {
                registered.retain(|r| !closed.contains(&r.id));
            }
        }
    }

    /// Number of handlers currently registered for `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }

    fn register(&self, event: String, handler: Handler<T>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.clone())
            .or_default()
            .push(Registration { id, handler });
        Subscription { event, id }
    }
}

impl<T> Events<T>
where
    T: Clone + Send + 'static,
{
    /// Delivers every future `event` payload into a channel.
    ///
    /// The listener unregisters itself on the first trigger after the
    /// receiver is dropped.
    pub fn stream(&self, event: impl Into<String>) -> flume::Receiver<T> {
        let (tx, rx) = flume::unbounded();
        self.register(
            event.into(),
            Arc::new(move |item: &T| tx.send(item.clone()).is_ok()),
        );
        rx
    }
}

impl<T: 'static> Default for Events<T> {
    fn default() -> Self {
        Self::new()
    }
}
