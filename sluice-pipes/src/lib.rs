//! Sluice Pipes
//!
//! This crate provides ready-made pipe behaviors that plug into
//! [`sluice::Pipe`]: predicate filters, item transforms and an in-memory
//! collection that replays its contents into new downstreams.

#![warn(missing_docs)]

pub mod collection;
pub mod error;
pub mod filter;
pub mod transform;

pub use collection::CollectionPipe;
pub use error::PipesError;
pub use filter::FilterPipe;
pub use transform::TransformPipe;
