use crate::{
    config::PipeConfig,
    error::{PipeError, Stage},
    events::{Events, ADD, ADDING, ERROR, REMOVE, REMOVING},
    logger::{Logger, TracingLogger},
    pipe::{
        behavior::PipeBehavior,
        downstream::Downstream,
        pending::Pending,
        types::{Resolution, Settled},
    },
};
use futures::FutureExt;
use std::{any::Any, fmt, future::Future, panic::AssertUnwindSafe, sync::Arc};
use tracing::{debug, error, instrument};

type Outcome<B> = Result<
    Settled<<B as crate::PipeComponent>::Item>,
    PipeError<<B as crate::PipeComponent>::Error>,
>;

/// A node in an item-flow graph.
///
/// Items enter through [`Pipe::add`] and leave through [`Pipe::remove`]. Each
/// call emits a starting event right away, runs the behavior's hooks on the
/// tokio runtime and emits a completion event once they resolve. Pipes chained
/// with [`Pipe::pipe`] replay every completed `add`/`remove` downstream.
///
/// `Pipe` is a handle: clones share the same behavior, logger and handlers.
///
/// # Examples
///
/// ```
/// use sluice::{Passthrough, Pipe, PipeConfig, Settled};
///
/// # tokio_test::block_on(async {
/// let users = Pipe::new(Passthrough::<String>::new(), PipeConfig::default().with_name("users"));
/// let view = Pipe::new(Passthrough::<String>::new(), PipeConfig::default().with_name("view"));
/// let shown = view.events().stream("add");
///
/// users.pipe(view.clone());
/// let settled = users.add("ada".to_string()).await.unwrap();
///
/// assert_eq!(settled, Settled::Completed { item: "ada".to_string(), event: "add".to_string() });
/// assert_eq!(shown.recv_async().await.unwrap(), "ada");
/// # });
/// ```
pub struct Pipe<B: PipeBehavior> {
    inner: Arc<PipeInner<B>>,
}

struct PipeInner<B: PipeBehavior> {
    behavior: B,
    name: String,
    logger: Arc<dyn Logger>,
    events: Events<B::Item>,
    errors: Events<PipeError<B::Error>>,
}

impl<B: PipeBehavior> Pipe<B> {
    /// Creates a new pipe.
    ///
    /// # Arguments
    ///
    /// * `behavior` - The hooks deciding admission and performing side effects
    /// * `config` - Name and optional logger; a [`TracingLogger`] is used when no logger is given
    #[must_use]
    pub fn new(behavior: B, config: PipeConfig) -> Self {
        let PipeConfig { name, logger } = config;
        let logger = logger.unwrap_or_else(|| Arc::new(TracingLogger::new(name.clone())));
        debug!(pipe = %name, "Creating new pipe");
        Self {
            inner: Arc::new(PipeInner {
                behavior,
                name,
                logger,
                events: Events::new(),
                errors: Events::new(),
            }),
        }
    }

    /// Creates a new pipe with the default configuration.
    #[must_use]
    pub fn with_behavior(behavior: B) -> Self {
        Self::new(behavior, PipeConfig::default())
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn behavior(&self) -> &B {
        &self.inner.behavior
    }

    /// The pipe's event channel. Lifecycle events are `adding`, `add`,
    /// `removing`, `remove` and any name a hook resolves with.
    pub fn events(&self) -> &Events<B::Item> {
        &self.inner.events
    }

    /// Registers `handler` for `event` and returns the pipe for chaining.
    pub fn on<F>(&self, event: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&B::Item) + Send + Sync + 'static,
    {
        self.inner.events.on(event, handler);
        self
    }

    /// Registers `handler` for every failed operation on this pipe.
    pub fn on_error<F>(&self, handler: F) -> &Self
    where
        F: Fn(&PipeError<B::Error>) + Send + Sync + 'static,
    {
        self.inner.errors.on(ERROR, handler);
        self
    }

    /// Delivers every future failed operation into a channel.
    pub fn error_stream(&self) -> flume::Receiver<PipeError<B::Error>> {
        self.inner.errors.stream(ERROR)
    }

    /// Starts adding `item`.
    ///
    /// Emits `adding` before returning. The filter hook then decides admission
    /// and the add hook performs the side effect; once it resolves the pipe
    /// emits `add`, or the event name the hook resolved with.
    ///
    /// # Returns
    ///
    /// A handle resolving with the operation's outcome. It covers both the
    /// filter and the add stage, so it stays pending for as long as either hook
    /// does. Failures, panics included, are also delivered to the error channel.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn add(&self, item: B::Item) -> Pending<B::Item, B::Error> {
        self.inner.logger.info(&format!("adding {item:?}"));
        self.inner.events.trigger(ADDING, &item);

        let inner = Arc::clone(&self.inner);
        Pending::spawn(async move { inner.settle(inner.admit(item)).await })
    }

    /// Starts removing `item`.
    ///
    /// Emits `removing` before returning, then emits `remove`, or the event
    /// name the remove hook resolved with, once the hook resolves. The returned
    /// handle settles with the remove hook.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn remove(&self, item: B::Item) -> Pending<B::Item, B::Error> {
        self.inner.logger.info(&format!("removing {item:?}"));
        self.inner.events.trigger(REMOVING, &item);

        let inner = Arc::clone(&self.inner);
        Pending::spawn(async move { inner.settle(inner.discard(item)).await })
    }

    /// Forwards this pipe's completed operations to `other`.
    ///
    /// Runs the behavior's `on_pipe` hook, then replays every `add` event as
    /// `other.add` and every `remove` event as `other.remove`. Nothing guards
    /// against cycles: a pipe that reaches itself forwards forever.
    ///
    /// # Returns
    ///
    /// `other`, so `a.pipe(b).pipe(c)` wires `a` to `b` and `b` to `c`.
    #[instrument(skip(self, other), fields(pipe = %self.inner.name))]
    pub fn pipe<D>(&self, other: D) -> D
    where
        D: Downstream<B::Item> + Clone + 'static,
    {
        self.inner
            .logger
            .info(&format!("piped {self} to {}", other.label()));
        self.inner.behavior.on_pipe(&other);

        let on_add = other.clone();
        let on_remove = other.clone();
        self.inner
            .events
            .on(ADD, move |item: &B::Item| on_add.add(item.clone()))
            .on(REMOVE, move |item: &B::Item| on_remove.remove(item.clone()));
        debug!("Downstream attached");
        other
    }
}

impl<B: PipeBehavior> PipeInner<B> {
    async fn admit(&self, item: B::Item) -> Outcome<B> {
        let filtered = match self
            .behavior
            .add_filter(item)
            .await
            .map_err(|source| PipeError::Hook {
                stage: Stage::Filter,
                source,
            })? {
            Resolution::Item { item, .. } => item,
            Resolution::Veto => return Ok(self.vetoed(Stage::Filter)),
            Resolution::Empty => {
                return Err(PipeError::EmptyResolution {
                    stage: Stage::Filter,
                })
            }
        };

        self.logger.info(&format!("filter {filtered:?}"));
        let resolution = self
            .behavior
            .add(filtered)
            .await
            .map_err(|source| PipeError::Hook {
                stage: Stage::Add,
                source,
            })?;
        self.complete(Stage::Add, resolution, "added", ADD)
    }

    async fn discard(&self, item: B::Item) -> Outcome<B> {
        let resolution = self
            .behavior
            .remove(item)
            .await
            .map_err(|source| PipeError::Hook {
                stage: Stage::Remove,
                source,
            })?;
        self.complete(Stage::Remove, resolution, "removed", REMOVE)
    }

    // Only items reach listeners; an empty resolution is the behavior's bug
    fn complete(
        &self,
        stage: Stage,
        resolution: Resolution<B::Item>,
        verb: &str,
        default_event: &str,
    ) -> Outcome<B> {
        match resolution {
            Resolution::Item { item, event } => {
                self.logger.info(&format!("{verb} {item:?}"));
                let event = event.unwrap_or_else(|| default_event.to_string());
                self.events.trigger(&event, &item);
                Ok(Settled::Completed { item, event })
            }
            Resolution::Veto => Ok(self.vetoed(stage)),
            Resolution::Empty => Err(PipeError::EmptyResolution { stage }),
        }
    }

    fn vetoed(&self, stage: Stage) -> Settled<B::Item> {
        debug!(pipe = %self.name, %stage, "Item vetoed");
        Settled::Vetoed
    }

    // A panicking hook or handler ends up on the error channel as `Aborted`
    async fn settle<F>(&self, operation: F) -> Outcome<B>
    where
        F: Future<Output = Outcome<B>>,
    {
        let outcome = AssertUnwindSafe(operation)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(PipeError::Aborted(panic_message(panic.as_ref()))));
        self.report(outcome)
    }

    fn report(&self, outcome: Outcome<B>) -> Outcome<B> {
        if let Err(ref e) = outcome {
            error!(pipe = %self.name, "Pipe operation failed: {e}");
            self.errors.trigger(ERROR, e);
        }
        outcome
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked".to_string()
    }
}

impl<B: PipeBehavior> Downstream<B::Item> for Pipe<B> {
    fn add(&self, item: B::Item) {
        // Detached: the upstream never waits on its downstream
        let _ = Self::add(self, item);
    }

    fn remove(&self, item: B::Item) {
        let _ = Self::remove(self, item);
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

impl<B: PipeBehavior> Clone for Pipe<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: PipeBehavior> fmt::Display for Pipe<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pipe({})", self.inner.name)
    }
}

impl<B: PipeBehavior> fmt::Debug for Pipe<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe")
            .field("name", &self.inner.name)
            .finish_non_exhaustive()
    }
}
