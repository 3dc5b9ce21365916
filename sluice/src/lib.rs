//! Composable asynchronous item pipes.
//!
//! A [`Pipe`] admits items through a filter stage, performs an add or remove
//! step and announces each phase as an event. Pipes chain into graphs with
//! [`Pipe::pipe`], e.g. a users collection flowing into a view.

pub mod composer;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod pipe;

// Re-export main types for easier access
pub use composer::Pipe;
pub use config::PipeConfig;
pub use error::{PipeError, Stage};
pub use events::{Events, Subscription};
pub use logger::{Logger, TracingLogger};
pub use pipe::behavior::{Passthrough, PipeBehavior};
pub use pipe::component::PipeComponent;
pub use pipe::downstream::Downstream;
pub use pipe::pending::Pending;
pub use pipe::types::{PipeFuture, Resolution, Settled};
