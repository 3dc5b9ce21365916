use std::sync::Arc;

/// Anything a pipe can forward its completed operations to.
///
/// Both calls are fire-and-forget: the upstream pipe does not wait for the
/// downstream to settle.
pub trait Downstream<T>: Send + Sync {
    fn add(&self, item: T);

    fn remove(&self, item: T);

    /// Name used when logging the chain.
    fn label(&self) -> String;
}

impl<T, D> Downstream<T> for Arc<D>
where
    D: Downstream<T> + ?Sized,
{
    fn add(&self, item: T) {
        (**self).add(item);
    }

    fn remove(&self, item: T) {
        (**self).remove(item);
    }

    fn label(&self) -> String {
        (**self).label()
    }
}
