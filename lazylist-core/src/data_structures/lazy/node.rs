use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub(crate) type NodePtr<T> = *mut LazyNode<T>;

/// A single element of a [`LazyList`](super::LazyList), or its head sentinel.
///
/// The node knows nothing about the list it lives in. It only offers the
/// primitives the list protocol is built from:
///
/// - `next` is loaded without locking by every traversal and stored only while
///   the owning node's lock is held.
/// - `marked` flips from `false` to `true` exactly once, under the node's own
///   lock, before the node is unlinked.
/// - `lock` protects writes to `next` and `marked`. It guards no data itself.
///
#[derive(Debug)]
pub struct LazyNode<T> {
    data: Option<T>,
    next: AtomicPtr<LazyNode<T>>,
    marked: AtomicBool,
    lock: Mutex<()>,
}

impl<T> LazyNode<T> {
    pub(crate) fn new(key: T, next: NodePtr<T>) -> Self {
        LazyNode {
            data: Some(key),
            next: AtomicPtr::new(next),
            marked: AtomicBool::new(false),
            lock: Mutex::new(()),
        }
    }

    /// The sentinel carries no key and orders before every element.
    pub(crate) fn new_sentinel() -> Self {
        LazyNode {
            data: None,
            next: AtomicPtr::new(ptr::null_mut()),
            marked: AtomicBool::new(false),
            lock: Mutex::new(()),
        }
    }

    pub(crate) fn is_sentinel(&self) -> bool {
        self.data.is_none()
    }

    pub(crate) fn key(&self) -> &T {
        self.data
            .as_ref()
            .expect("Cannot get key from sentinel node")
    }

    // =========================================================================
    // Next pointer accessors
    // =========================================================================

    /// Load next pointer (Acquire ordering)
    #[inline]
    pub(crate) fn next(&self) -> NodePtr<T> {
        self.next.load(Ordering::Acquire)
    }

    /// Store next pointer (Release ordering). Caller holds this node's lock,
    /// or the node is not yet reachable.
    #[inline]
    pub(crate) fn set_next(&self, next: NodePtr<T>) {
        self.next.store(next, Ordering::Release)
    }

    // =========================================================================
    // Logical deletion
    // =========================================================================

    /// Caller holds this node's lock.
    #[inline]
    pub(crate) fn mark(&self) {
        self.marked.store(true, Ordering::Release)
    }

    #[inline]
    pub(crate) fn is_marked(&self) -> bool {
        self.marked.load(Ordering::Acquire)
    }

    /// Acquire the node lock.
    ///
    /// Nothing panics while a node lock is held, but a poisoned lock still
    /// protects a consistent node, so poisoning is ignored.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deallocate a node allocated with `Box::new`.
    ///
    /// # Safety
    /// - `node` came from `Box::into_raw` and is freed exactly once
    /// - no reader can still reach `node`
    pub(crate) unsafe fn dealloc_ptr(node: NodePtr<T>) {
        unsafe { drop(Box::from_raw(node)) };
    }
}
