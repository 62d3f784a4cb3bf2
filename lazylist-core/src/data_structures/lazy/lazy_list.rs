use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::iter::Iter;
use super::node::{LazyNode, NodePtr};
use crate::data_structures::ConcurrentSortedSet;
use crate::data_structures::internal::{Attempt, retry};
use crate::error::{InvariantViolation, Result};
use crate::guard::Guard;

///
/// Concurrent sorted set on a singly linked list with lazy synchronization
/// (Heller et al., 'A Lazy Concurrent List-Based Set Algorithm').
///
/// Keys are `Send + 'static`: a deleted key is dropped by the guard, possibly
/// on another thread and after the list itself is gone.
///
// =============================================================================
// LAZY LIST PROTOCOL
// =============================================================================
//
// ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐
// │ HEAD │───►│  10  │───►│  20  │───►│  30  │───► NULL
// │(sent)│    │      │    │      │    │      │
// └──────┘    └──────┘    └──────┘    └──────┘
//
// Each node carries its own lock and a `marked` flag. Reads never lock.
//
// INVARIANTS:
// 1. Every next pointer leads to a strictly greater key, so any traversal
//    (even one standing on an unlinked node) sees ascending keys
// 2. A node is marked before it is unlinked, and both happen while holding
//    the locks of the node and its predecessor
// 3. HEAD is never marked or removed
// 4. Nodes are retired to the guard only after they are unlinked
//
// INSERT (one lock):
//   search (marked nodes included) ─► lock pred ─► validate ─► link
//   validate: pred.next == curr && !pred.marked && !curr.marked
//
//          pred ──────────────────► curr
//          pred ───► new ─────────► curr     (new.next set before publishing)
//
// DELETE (two locks, curr first):
//   search (marked nodes skipped) ─► lock curr ─► lock pred ─► validate
//   ─► mark curr ─► unlink ─► unlock pred, curr ─► retire curr
//   validate: !curr.marked && pred.next == curr && !pred.marked
//
//          pred ───► curr(marked) ───► next
//          pred ─────────────────────► next
//
// DEADLOCK FREEDOM:
// Insert never waits while holding a lock. Delete waits for pred while
// holding curr, and pred always has a smaller key than curr, so waits only
// point towards HEAD and cannot form a cycle.
//
// COUNTER:
// `size` is bumped before the new node is published and dropped after the
// node is unlinked. It is advisory and may briefly disagree with a traversal.
//
// =============================================================================
//
pub struct LazyList<T, G: Guard> {
    head: NodePtr<T>,
    size: AtomicUsize,
    /// Shared guard instance for deferred destruction of unlinked nodes.
    guard: G,
}

/// How the search phase treats marked nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    /// Marked nodes still take part in ordering (insert).
    Structural,
    /// Marked nodes are stepped over (delete).
    LiveOnly,
}

impl<T, G> LazyList<T, G>
where
    T: Ord + Send + 'static,
    G: Guard,
{
    pub fn new() -> Self {
        let head = Box::into_raw(Box::new(LazyNode::new_sentinel()));
        LazyList {
            head,
            size: AtomicUsize::new(0),
            guard: G::default(),
        }
    }

    /// Get the shared guard instance for this list.
    pub fn guard(&self) -> &G {
        &self.guard
    }

    #[inline]
    fn head_node(&self) -> &LazyNode<T> {
        // Safety: the sentinel lives as long as the list.
        unsafe { &*self.head }
    }

    // =========================================================================
    // Public operations
    // =========================================================================

    /// Check if a value is in the list.
    ///
    /// Lock-free and never retries. Marked nodes are skipped wherever they
    /// sit, so a logically deleted value is never reported.
    ///
    pub fn contains(&self, key: &T) -> bool {
        let _guard = G::pin();
        let mut curr = self.head_node().next();

        // Safety: nodes reached from HEAD stay allocated while pinned.
        while let Some(node) = unsafe { curr.as_ref() } {
            if !node.is_marked() && node.key() >= key {
                return node.key() == key;
            }
            curr = node.next();
        }
        false
    }

    /// Insert a value.
    ///
    /// Returns `true` if inserted, `false` if the value already exists.
    /// Blocks only on the predecessor's lock; restarts while validation fails.
    ///
    pub fn insert(&self, key: T) -> bool {
        let _guard = G::pin();
        retry(key, |key| self.try_insert(key))
    }

    /// Remove a value.
    ///
    /// Returns `true` if removed, `false` if not found.
    /// Blocks only on the node's and its predecessor's locks; restarts while
    /// validation fails.
    ///
    pub fn delete(&self, key: &T) -> bool {
        let _guard = G::pin();
        retry(key, |key| self.try_delete(key))
    }

    /// Visit values in ascending order until `visit` returns `false`.
    ///
    /// Lock-free. Marked nodes are NOT filtered: a value removed by a
    /// concurrent delete may still be visited.
    ///
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let _guard = G::pin();
        let mut curr = self.head_node().next();

        while let Some(node) = unsafe { curr.as_ref() } {
            if !visit(node.key()) {
                break;
            }
            curr = node.next();
        }
    }

    /// Approximate number of values.
    ///
    /// Not synchronized with any traversal; exact once all operations have
    /// completed.
    ///
    pub fn len(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over cloned values, with the same consistency as [`range`].
    ///
    /// [`range`]: LazyList::range
    pub fn iter(&self) -> Iter<'_, T, G> {
        let guard = G::pin();
        Iter::new(guard, self.head_node().next())
    }

    // =========================================================================
    // Invariant checks
    // =========================================================================

    /// Check the invariants that hold at any time, even under concurrent
    /// mutation: HEAD is unmarked and live keys are strictly ascending.
    ///
    pub fn check_invariants(&self) -> Result<()> {
        let _guard = G::pin();
        let head = self.head_node();
        debug_assert!(head.is_sentinel());
        if head.is_marked() {
            return Err(InvariantViolation::MarkedSentinel);
        }

        let mut last: Option<&T> = None;
        let mut curr = head.next();
        let mut position = 0;
        while let Some(node) = unsafe { curr.as_ref() } {
            if !node.is_marked() {
                if last.is_some_and(|prev| prev >= node.key()) {
                    return Err(InvariantViolation::Unsorted { position });
                }
                last = Some(node.key());
            }
            position += 1;
            curr = node.next();
        }
        Ok(())
    }

    /// Check the invariants of a list with no operation in flight.
    ///
    /// Exclusive access proves quiescence. On top of [`check_invariants`],
    /// no marked node may be linked and `len()` must be exact.
    ///
    /// [`check_invariants`]: LazyList::check_invariants
    pub fn check_quiescent(&mut self) -> Result<()> {
        self.check_invariants()?;

        let mut counted = 0;
        let mut curr = self.head_node().next();
        while let Some(node) = unsafe { curr.as_ref() } {
            if node.is_marked() {
                return Err(InvariantViolation::MarkedNodeReachable { position: counted });
            }
            counted += 1;
            curr = node.next();
        }

        let reported = self.len();
        if counted != reported {
            return Err(InvariantViolation::LenMismatch { counted, reported });
        }
        Ok(())
    }

    // =========================================================================
    // Protocol internals
    // =========================================================================

    /// Find `(pred, curr)` with `pred.key < key <= curr.key`.
    ///
    /// `pred` may be HEAD; `curr` is null past the end of the list.
    /// Caller must be pinned.
    ///
    fn find_window(&self, key: &T, traversal: Traversal) -> (NodePtr<T>, NodePtr<T>) {
        let mut pred = self.head;
        let mut curr = self.head_node().next();

        while let Some(node) = unsafe { curr.as_ref() } {
            let skip = traversal == Traversal::LiveOnly && node.is_marked();
            if !skip && node.key() >= key {
                break;
            }
            pred = curr;
            curr = node.next();
        }
        (pred, curr)
    }

    fn try_insert(&self, key: T) -> Attempt<T, bool> {
        let (pred, curr) = self.find_window(&key, Traversal::Structural);
        // Safety: pinned by `insert`; pred is never null.
        let pred_node = unsafe { &*pred };
        let curr_node = unsafe { curr.as_ref() };

        if curr_node.is_some_and(|node| node.key() == &key) {
            return Attempt::Commit(false);
        }

        let pred_lock = pred_node.lock();
        let valid = pred_node.next() == curr
            && !pred_node.is_marked()
            && !curr_node.is_some_and(|node| node.is_marked());
        if !valid {
            drop(pred_lock);
            return Attempt::Retry(key);
        }

        // The successor is in place before the node becomes reachable.
        let node = Box::into_raw(Box::new(LazyNode::new(key, curr)));
        self.size.fetch_add(1, Ordering::AcqRel);
        pred_node.set_next(node);
        drop(pred_lock);

        Attempt::Commit(true)
    }

    fn try_delete<'k>(&self, key: &'k T) -> Attempt<&'k T, bool> {
        let (pred, curr) = self.find_window(key, Traversal::LiveOnly);
        // Safety: pinned by `delete`; pred is never null.
        let pred_node = unsafe { &*pred };
        let Some(curr_node) = (unsafe { curr.as_ref() }) else {
            return Attempt::Commit(false);
        };
        if curr_node.key() != key {
            return Attempt::Commit(false);
        }

        let curr_lock = curr_node.lock();
        if curr_node.is_marked() {
            // Another delete won the race.
            drop(curr_lock);
            return Attempt::Retry(key);
        }

        let pred_lock = pred_node.lock();
        if pred_node.next() != curr || pred_node.is_marked() {
            drop(pred_lock);
            drop(curr_lock);
            return Attempt::Retry(key);
        }

        curr_node.mark();
        pred_node.set_next(curr_node.next());
        self.size.fetch_sub(1, Ordering::AcqRel);
        drop(pred_lock);
        drop(curr_lock);

        // Safety: curr is marked and unlinked, and only the delete that
        // marked it gets here.
        unsafe {
            self.guard.defer_destroy(curr, LazyNode::dealloc_ptr);
        }
        Attempt::Commit(true)
    }
}

impl<T, G> ConcurrentSortedSet<T> for LazyList<T, G>
where
    T: Ord + Send + 'static,
    G: Guard,
{
    fn contains(&self, key: &T) -> bool {
        LazyList::contains(self, key)
    }

    fn insert(&self, key: T) -> bool {
        LazyList::insert(self, key)
    }

    fn delete(&self, key: &T) -> bool {
        LazyList::delete(self, key)
    }

    fn range<F>(&self, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        LazyList::range(self, visit)
    }

    fn len(&self) -> usize {
        LazyList::len(self)
    }
}

impl<T, G> Default for LazyList<T, G>
where
    T: Ord + Send + 'static,
    G: Guard,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G> FromIterator<T> for LazyList<T, G>
where
    T: Ord + Send + 'static,
    G: Guard,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let list = Self::new();
        for key in iter {
            list.insert(key);
        }
        list
    }
}

impl<T, G> Extend<T> for LazyList<T, G>
where
    T: Ord + Send + 'static,
    G: Guard,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T, G> fmt::Debug for LazyList<T, G>
where
    T: Ord + Send + Clone + fmt::Debug + 'static,
    G: Guard,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// Safety: nodes are shared between threads through the raw head pointer;
// keys are read concurrently and dropped by whichever thread frees them.
unsafe impl<T: Send + Sync, G: Guard> Send for LazyList<T, G> {}
unsafe impl<T: Send + Sync, G: Guard> Sync for LazyList<T, G> {}

impl<T, G: Guard> Drop for LazyList<T, G> {
    fn drop(&mut self) {
        // Exclusive access: only linked nodes are left to free here, retired
        // ones belong to the guard.
        let mut freed = 0usize;
        let mut curr = unsafe { (*self.head).next() };
        while !curr.is_null() {
            let next = unsafe { (*curr).next() };
            unsafe { LazyNode::dealloc_ptr(curr) };
            curr = next;
            freed += 1;
        }
        unsafe { LazyNode::dealloc_ptr(self.head) };

        tracing::debug!(freed, "dropped lazy list");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::guard::DeferredGuard;

    type TestList = LazyList<i32, DeferredGuard>;

    /// Mark `victim` under its lock, as a delete does before unlinking, and
    /// check that `insert(key)` keeps retrying until the unlink happens.
    fn insert_blocked_by_marked_node(victim: i32, key: i32, expected: Vec<i32>) {
        let list: TestList = [1, 3].into_iter().collect();
        let (pred, curr) = list.find_window(&victim, Traversal::Structural);
        let (pred_node, curr_node) = unsafe { (&*pred, &*curr) };
        let committed = AtomicBool::new(false);

        thread::scope(|s| {
            let curr_lock = curr_node.lock();
            curr_node.mark();

            let inserter = s.spawn(|| {
                let inserted = list.insert(key);
                committed.store(true, Ordering::Release);
                inserted
            });

            thread::sleep(Duration::from_millis(50));
            assert!(!committed.load(Ordering::Acquire));
            assert!(!list.contains(&key));

            {
                let _pred_lock = pred_node.lock();
                pred_node.set_next(curr_node.next());
            }
            list.size.fetch_sub(1, Ordering::AcqRel);
            drop(curr_lock);
            unsafe { list.guard.defer_destroy(curr, LazyNode::dealloc_ptr) };

            assert!(inserter.join().unwrap());
        });

        assert!(committed.load(Ordering::Acquire));
        assert_eq!(list.to_vec(), expected);
        assert_eq!(list.len(), expected.len());
    }

    #[test]
    fn test_insert_retries_on_marked_successor() {
        // Window for 2 is (1, 3); 3 is marked.
        insert_blocked_by_marked_node(3, 2, vec![1, 2]);
    }

    #[test]
    fn test_insert_retries_on_marked_predecessor() {
        // Window for 4 is (3, end); 3 is marked.
        insert_blocked_by_marked_node(3, 4, vec![1, 4]);
    }

    #[test]
    fn test_empty_list() {
        let list = TestList::new();
        assert!(list.is_empty());
        assert!(!list.contains(&0));
        assert!(!list.delete(&0));
        assert_eq!(list.to_vec(), Vec::<i32>::new());
    }

    #[test]
    fn test_extreme_keys() {
        // The sentinel holds no key, so the extremes are ordinary values.
        let list = TestList::new();
        assert!(list.insert(i32::MIN));
        assert!(list.insert(i32::MAX));
        assert!(list.insert(0));
        assert_eq!(list.to_vec(), vec![i32::MIN, 0, i32::MAX]);
        assert!(list.delete(&i32::MIN));
        assert!(!list.contains(&i32::MIN));
    }

    #[test]
    fn test_find_window() {
        let list: TestList = [10, 20, 30].into_iter().collect();
        let _guard = DeferredGuard::pin();

        let (pred, curr) = list.find_window(&20, Traversal::Structural);
        unsafe {
            assert_eq!(*(*pred).key(), 10);
            assert_eq!(*(*curr).key(), 20);
        }

        let (pred, curr) = list.find_window(&5, Traversal::Structural);
        assert_eq!(pred, list.head);
        unsafe { assert_eq!(*(*curr).key(), 10) };

        let (pred, curr) = list.find_window(&31, Traversal::LiveOnly);
        unsafe { assert_eq!(*(*pred).key(), 30) };
        assert!(curr.is_null());
    }

    #[test]
    fn test_marked_node_is_invisible_to_contains() {
        let list: TestList = [1, 2, 3].into_iter().collect();

        // Mark 2 without unlinking it, as a delete would between its two
        // steps.
        let (_, curr) = list.find_window(&2, Traversal::Structural);
        let node = unsafe { &*curr };
        {
            let _lock = node.lock();
            node.mark();
        }

        assert!(!list.contains(&2));
        // Range does not filter marked nodes.
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
        // Delete skips it and finds nothing live.
        assert!(!list.delete(&2));
        assert_eq!(list.check_invariants(), Ok(()));

        // Unlink by hand so the list drops cleanly.
        let (pred, _) = list.find_window(&2, Traversal::Structural);
        let pred = unsafe { &*pred };
        {
            let _lock = pred.lock();
            pred.set_next(node.next());
        }
        list.size.fetch_sub(1, Ordering::AcqRel);
        unsafe { list.guard.defer_destroy(curr, LazyNode::dealloc_ptr) };
        assert!(!list.contains(&2));
    }

    #[test]
    fn test_check_quiescent_reports_marked_node() {
        let mut list: TestList = [1, 2, 3].into_iter().collect();
        assert_eq!(list.check_quiescent(), Ok(()));

        let (_, curr) = list.find_window(&3, Traversal::Structural);
        unsafe { (*curr).mark() };
        assert_eq!(
            list.check_quiescent(),
            Err(InvariantViolation::MarkedNodeReachable { position: 2 })
        );
    }

    #[test]
    fn test_check_quiescent_reports_len_mismatch() {
        let mut list: TestList = [4, 5].into_iter().collect();
        list.size.fetch_add(1, Ordering::AcqRel);
        assert_eq!(
            list.check_quiescent(),
            Err(InvariantViolation::LenMismatch {
                counted: 2,
                reported: 3
            })
        );
    }

    #[test]
    fn test_deleted_nodes_are_retired_once() {
        let list: TestList = (0..10).collect();
        for i in 0..10 {
            assert!(list.delete(&i));
        }
        assert_eq!(list.guard().pending(), 10);
        assert!(list.is_empty());
    }

    #[test]
    fn test_debug_prints_as_set() {
        let list: TestList = [3, 1, 2].into_iter().collect();
        assert_eq!(format!("{:?}", list), "{1, 2, 3}");
    }
}
