//! Construction options for a [`Pipe`](crate::Pipe).

use crate::logger::Logger;
use std::fmt;
use std::sync::Arc;

/// Configuration for a pipe
#[derive(Clone)]
pub struct PipeConfig {
    /// Name shown in log messages and when the pipe is displayed
    pub name: String,
    /// Logger receiving lifecycle messages. A [`TracingLogger`](crate::TracingLogger)
    /// is created when unset.
    pub logger: Option<Arc<dyn Logger>>,
}

impl PipeConfig {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            name: "pipe".to_string(),
            logger: None,
        }
    }
}

impl fmt::Debug for PipeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipeConfig")
            .field("name", &self.name)
            .field("logger", &self.logger.as_ref().map(|_| "custom"))
            .finish()
    }
}
