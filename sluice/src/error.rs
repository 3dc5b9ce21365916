use std::fmt;
use thiserror::Error;

/// The step of a pipe operation an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Filter,
    Add,
    Remove,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Filter => write!(f, "filter"),
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Error type specific to Pipe operations.
///
/// `E` is the error type of the pipe's behavior; hook failures carry it
/// unchanged so callers can match on their own error variants.
#[derive(Error, Debug, Clone)]
pub enum PipeError<E> {
    /// A hook settled its operation without an item. This is a programming
    /// error in the behavior, not a runtime condition.
    #[error("Make sure your {stage} hook resolves the operation with an item")]
    EmptyResolution { stage: Stage },

    /// A hook returned an error.
    #[error("{stage} hook failed: {source}")]
    Hook {
        stage: Stage,
        #[source]
        source: E,
    },

    /// The task driving the operation panicked or was cancelled.
    #[error("Pipe operation aborted: {0}")]
    Aborted(String),
}

impl<E> PipeError<E> {
    /// The stage the error was raised from, if it came from a hook.
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::EmptyResolution { stage } | Self::Hook { stage, .. } => Some(*stage),
            Self::Aborted(_) => None,
        }
    }

    /// Whether the error signals a broken behavior implementation.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::EmptyResolution { .. })
    }
}
