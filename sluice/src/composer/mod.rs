pub mod pipe;

pub use self::pipe::Pipe;
