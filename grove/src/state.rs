use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::wakeup::{WakeupHandle, WakeupSender};

/// Externally owned state with interior mutability.
///
/// `SharedState<T>` is how a host hands the environment data it keeps
/// ownership of, such as the view state or the item source. The host keeps a
/// clone and writes through it; the environment only reads, and always reads
/// the value current at recompute time rather than the value at scheduling
/// time.
///
/// Every write marks the state dirty and, once an environment driver is
/// attached, wakes it so the change is picked up.
///
/// # Example
///
/// ```
/// use grove::prelude::*;
///
/// let view = SharedState::new(ViewState::default());
/// view.update(|v| {
///     v.tree_mut("files").expand("src");
/// });
/// assert!(view.read(|v| v.is_expanded(&"files".into(), &"src".into())));
/// ```
#[derive(Debug)]
pub struct SharedState<T> {
    inner: Arc<RwLock<T>>,
    dirty: Arc<AtomicBool>,
    wakeup: WakeupHandle,
}

impl<T> SharedState<T> {
    /// Create a new state with the given value
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
            dirty: Arc::new(AtomicBool::new(false)),
            wakeup: WakeupHandle::new(),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Run a closure against the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Set a new value
    pub fn set(&self, value: T) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = value;
            self.mark_dirty();
        }
    }

    /// Update the value using a closure
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let result = self.inner.write().ok().map(|mut guard| f(&mut guard));
        if result.is_some() {
            self.mark_dirty();
        }
        result
    }

    /// Check if the state has been modified since last check
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    /// Attach the wakeup sender of an environment driver.
    pub(crate) fn install_wakeup(&self, sender: WakeupSender) {
        self.wakeup.install(sender);
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.wakeup.send();
    }
}

impl<T> Clone for SharedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            wakeup: self.wakeup.clone(),
        }
    }
}

impl<T: Default> Default for SharedState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
