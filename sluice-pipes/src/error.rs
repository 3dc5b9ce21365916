//! Error types for sluice-pipes

use thiserror::Error;

/// Errors that can occur inside the ready-made pipe behaviors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipesError {
    /// The item store could not be accessed
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for pipe behavior operations
pub type Result<T> = std::result::Result<T, PipesError>;
