//! Deferred guard implementation for testing.

#[cfg(debug_assertions)]
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use super::Guard;

/// A guard that keeps every retired node until the guard itself is dropped.
///
/// Destruction timing is fully predictable, which is what tests want. Memory
/// grows with the number of deletes, so this is not for long-running use.
///
/// In debug builds a node retired twice panics immediately.
///
pub struct DeferredGuard {
    deferred: Mutex<Vec<DeferredNode>>,
    #[cfg(debug_assertions)]
    seen: Mutex<HashSet<usize>>,
}

struct DeferredNode {
    ptr: *mut (),
    dealloc: unsafe fn(*mut ()),
}

// Safety: the pointee is `Send` (required by `defer_destroy`), and access
// goes through the Mutex.
unsafe impl Send for DeferredNode {}

impl DeferredGuard {
    pub fn new() -> Self {
        DeferredGuard {
            deferred: Mutex::new(Vec::new()),
            #[cfg(debug_assertions)]
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Number of nodes waiting to be freed.
    pub fn pending(&self) -> usize {
        self.deferred
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for DeferredGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DeferredGuard {
    fn drop(&mut self) {
        let nodes = self
            .deferred
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);

        for node in nodes.drain(..) {
            unsafe {
                (node.dealloc)(node.ptr);
            }
        }
    }
}

impl Guard for DeferredGuard {
    /// Nothing is freed before the stored guard drops, so reads need no pin.
    type ReadGuard = ();

    fn pin() -> Self::ReadGuard {}

    unsafe fn defer_destroy<N: Send + 'static>(
        &self,
        node: *mut N,
        dealloc: unsafe fn(*mut N),
    ) {
        #[cfg(debug_assertions)]
        {
            let addr = node as usize;
            let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
            if !seen.insert(addr) {
                panic!("DUPLICATE defer_destroy at {:#x}", addr);
            }
        }

        let node = DeferredNode {
            ptr: node as *mut (),
            dealloc: unsafe {
                std::mem::transmute::<unsafe fn(*mut N), unsafe fn(*mut ())>(dealloc)
            },
        };
        self.deferred
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(node);
    }
}
