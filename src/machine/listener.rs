//! Transition listeners: post-commit observers of a machine definition.

use crate::core::Context;
use parking_lot::RwLock;
use std::sync::Arc;

/// Observer invoked after every committed transition.
pub type TransitionListener<K, D> = Arc<dyn Fn(&Context<'_, K, D>) + Send + Sync>;

/// Ordered listener list shared by every instance of a definition.
pub(crate) struct Listeners<K, D> {
    inner: RwLock<Vec<TransitionListener<K, D>>>,
}

impl<K, D> Listeners<K, D> {
    pub(crate) fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn push(&self, listener: TransitionListener<K, D>) {
        self.inner.write().push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Notify listeners in registration order.
    ///
    /// Works on a snapshot, so a listener may register further listeners;
    /// those only observe later transitions.
    pub(crate) fn notify(&self, ctx: &Context<'_, K, D>) {
        let snapshot: Vec<_> = self.inner.read().iter().cloned().collect();
        for listener in &snapshot {
            listener(ctx);
        }
    }
}
