pub mod behavior;
pub mod component;
pub mod downstream;
pub mod pending;
pub mod types;
