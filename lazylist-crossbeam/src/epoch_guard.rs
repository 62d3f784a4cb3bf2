//! Epoch-based guard implementation using crossbeam-epoch.
//!
//! # Design
//!
//! `EpochGuard` is a zero-sized type that schedules destruction on the global
//! epoch collector. A list parameterized with `EpochGuard` pins the current
//! thread for the duration of every operation, and a node retired by `delete`
//! is freed only after every thread pinned at that time has unpinned:
//!
//! ```text
//! LazyList<i32, EpochGuard>
//!     │
//!     └── Uses crossbeam-epoch for memory safety
//! ```

use crossbeam_epoch::{self as epoch, Guard as CrossbeamGuard};
use lazylist_core::guard::Guard;

/// Epoch-based memory reclamation guard.
///
/// Unlike `DeferredGuard`, which stores pending destructions until the list
/// drops, `EpochGuard` holds no state. When `defer_destroy` is called, it:
/// 1. Pins the current thread to the current epoch
/// 2. Schedules the destruction to run after all threads have advanced
/// 3. Unpins immediately (the destruction is managed globally)
///
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochGuard {
    // Zero-sized - all state is in the global epoch collector
}

impl EpochGuard {
    pub fn new() -> Self {
        EpochGuard {}
    }
}

impl Guard for EpochGuard {
    /// An actual crossbeam guard that pins the current thread for the
    /// duration of reads.
    type ReadGuard = CrossbeamGuard;

    fn pin() -> Self::ReadGuard {
        epoch::pin()
    }

    unsafe fn defer_destroy<N: Send + 'static>(
        &self,
        node: *mut N,
        dealloc: unsafe fn(*mut N),
    ) {
        let guard = epoch::pin();
        unsafe {
            guard.defer_unchecked(move || {
                dealloc(node);
            });
        }
        // guard dropped here - unpins the thread
    }
}
