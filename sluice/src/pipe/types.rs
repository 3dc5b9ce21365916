use std::future::Future;
use std::pin::Pin;

// For every hook a pipe awaits
pub type PipeFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// What a hook settles its pending operation with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Resolved with an item, optionally replacing the completion event name.
    Item { item: T, event: Option<String> },
    /// The hook declined the item. The operation completes without an event.
    Veto,
    /// Resolved without an item. Pipes report this as a contract violation.
    Empty,
}

impl<T> Resolution<T> {
    #[must_use]
    pub const fn item(item: T) -> Self {
        Self::Item { item, event: None }
    }

    /// Replaces the completion event name. Has no effect on `Veto` or `Empty`.
    #[must_use]
    pub fn with_event(self, name: impl Into<String>) -> Self {
        match self {
            Self::Item { item, .. } => Self::Item {
                item,
                event: Some(name.into()),
            },
            other => other,
        }
    }
}

/// Final outcome of a pending `add` or `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    /// The operation ran to completion and `event` was emitted with `item`.
    Completed { item: T, event: String },
    /// A hook vetoed the item; no completion event was emitted.
    Vetoed,
}

impl<T> Settled<T> {
    pub const fn item(&self) -> Option<&T> {
        match self {
            Self::Completed { item, .. } => Some(item),
            Self::Vetoed => None,
        }
    }

    pub fn event(&self) -> Option<&str> {
        match self {
            Self::Completed { event, .. } => Some(event),
            Self::Vetoed => None,
        }
    }

    pub const fn is_vetoed(&self) -> bool {
        matches!(self, Self::Vetoed)
    }
}
