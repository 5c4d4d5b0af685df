//! Shared ownership for pipeline components with destruction deferred to the
//! owning execution context.
//!
//! Logging components are typically constructed on one thread during
//! configuration and then used from many worker threads emitting events. A
//! plain reference count would run the destructor on whichever thread happens
//! to drop the last reference, which may touch context-affine state off its
//! context. A [`SharedHandle`] instead posts the destruction to the target's
//! owning context when the count crosses zero, so "last reference dropped on
//! thread X" becomes "destructor runs on the owner's thread" without making
//! the dropping thread block.

use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use crate::component::Component;
use crate::context::ContextHandle;

struct Inner<T: Component + Send + 'static> {
    target: ManuallyDrop<T>,
    owner: ContextHandle,
}

impl<T: Component + Send + 'static> Drop for Inner<T> {
    fn drop(&mut self) {
        // Runs exactly once, on whichever thread dropped the last strong
        // handle. The target itself is moved into a task instead of being
        // destroyed here. Posting to the owner's own thread is fine too: the
        // task simply runs later in its queue.
        let target = unsafe { ManuallyDrop::take(&mut self.target) };
        self.owner.post(Box::new(move || drop(target)));
    }
}

/// A strong, reference-counted handle to a pipeline component.
///
/// Cloning and dropping are atomic and never block. While at least one strong
/// handle exists the target is readable from any thread holding one; after
/// the last strong handle is gone the target can no longer be reached at all,
/// which makes use-after-release unrepresentable rather than merely checked.
pub struct SharedHandle<T: Component + Send + 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: Component + Send + 'static> SharedHandle<T> {
    /// Takes ownership of a freshly configured component.
    ///
    /// The owning context is read from the component itself and fixed for the
    /// lifetime of the target. The strong count starts at one.
    pub fn wrap(target: T) -> SharedHandle<T> {
        let owner = target.owner().clone();

        SharedHandle {
            inner: Arc::new(Inner {
                target: ManuallyDrop::new(target),
                owner,
            }),
        }
    }

    /// Returns a non-owning observer of the target.
    pub fn downgrade(this: &SharedHandle<T>) -> WeakHandle<T> {
        WeakHandle {
            inner: Arc::downgrade(&this.inner),
        }
    }

    /// Number of strong handles currently alive.
    pub fn strong_count(this: &SharedHandle<T>) -> usize {
        Arc::strong_count(&this.inner)
    }
}

impl<T: Component + Send + 'static> Clone for SharedHandle<T> {
    fn clone(&self) -> SharedHandle<T> {
        SharedHandle {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Component + Send + 'static> Deref for SharedHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner.target
    }
}

/// A non-owning handle that must revalidate liveness before every access.
///
/// Once the strong count reaches zero [`WeakHandle::upgrade`] returns `None`,
/// even while the destruction task is still waiting in the owner's queue.
/// A failed upgrade is the designed outcome for optional back-references,
/// not an error.
pub struct WeakHandle<T: Component + Send + 'static> {
    inner: Weak<Inner<T>>,
}

impl<T: Component + Send + 'static> WeakHandle<T> {
    pub fn upgrade(&self) -> Option<SharedHandle<T>> {
        self.inner.upgrade().map(|inner| SharedHandle { inner })
    }
}

impl<T: Component + Send + 'static> Clone for WeakHandle<T> {
    fn clone(&self) -> WeakHandle<T> {
        WeakHandle {
            inner: self.inner.clone(),
        }
    }
}
