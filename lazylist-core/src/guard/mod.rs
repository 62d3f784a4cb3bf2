//! Guard trait for memory reclamation strategies.
//!
//! Lock-free readers may still be standing on a node that `delete` has just
//! unlinked, so an unlinked node cannot be freed on the spot. The `Guard`
//! decides when it is freed:
//!
//! ```text
//! LazyList<T, G: Guard>
//!     │
//!     ├── LazyList<T, EpochGuard>      (production, lazylist-crossbeam)
//!     └── LazyList<T, DeferredGuard>   (testing)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lazylist_core::{DeferredGuard, LazyList};
//! use lazylist_crossbeam::EpochGuard;
//!
//! // Production: epoch-based reclamation
//! let list: LazyList<i32, EpochGuard> = LazyList::new();
//! list.insert(42);
//!
//! // Testing: everything retired is freed with the list
//! let test_list: LazyList<i32, DeferredGuard> = LazyList::new();
//! ```

mod deferred_guard;

pub use deferred_guard::DeferredGuard;

/// A memory reclamation guard that protects concurrent access to nodes.
///
/// # Safety Contract
///
/// Implementations must ensure that a node passed to `defer_destroy` is not
/// freed while any `ReadGuard` pinned before the call is still alive.
///
/// # Design Note
///
/// One guard value is stored in each list and used only to schedule
/// destruction. Read protection comes from `pin()`, called once per operation.
///
pub trait Guard: Sized + Default + Send + Sync {
    /// An active guard that protects reads for its lifetime.
    ///
    /// For epoch-based guards, this holds a pinned `crossbeam_epoch::Guard`.
    /// For deferred guards, this is `()` since nothing is freed before the
    /// list itself.
    ///
    type ReadGuard: Sized;

    /// Pin an active read guard.
    ///
    fn pin() -> Self::ReadGuard;

    /// Schedule a node for deferred destruction.
    ///
    /// # Safety
    ///
    /// - `node` must be a valid pointer previously allocated by the list
    /// - `node` must be unlinked (not reachable by a new traversal)
    /// - `node` must not be retired twice
    /// - `dealloc` must be the correct deallocation function for `node`
    ///
    /// The node may be freed on another thread after the list is gone, hence
    /// `N: Send + 'static`.
    ///
    unsafe fn defer_destroy<N: Send + 'static>(
        &self,
        node: *mut N,
        dealloc: unsafe fn(*mut N),
    );
}
