use tracing::info;

/// Receives a pipe's lifecycle messages.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
}

/// Default logger: forwards messages to `tracing` at info level, tagged with
/// the pipe name. Silent when no subscriber is installed.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    pipe: String,
}

impl TracingLogger {
    #[must_use]
    pub fn new(pipe: impl Into<String>) -> Self {
        Self { pipe: pipe.into() }
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(pipe = %self.pipe, "{message}");
    }
}
