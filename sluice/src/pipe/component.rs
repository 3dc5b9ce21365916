use std::error::Error;
use std::fmt::Debug;

pub trait PipeComponent {
    type Item: Clone + Debug + Send + Sync + 'static;
    type Error: Error + Clone + Send + Sync + 'static;
}
