use std::marker::PhantomData;

use super::LazyList;
use super::node::NodePtr;
use crate::guard::Guard;

/// Iterator over a [`LazyList`] with guard protection.
///
/// Holds a read guard for its whole lifetime, so for epoch-based guards the
/// thread stays pinned until the iterator is dropped. Like
/// [`LazyList::range`], marked nodes are not filtered out.
///
pub struct Iter<'a, T, G: Guard> {
    _guard: G::ReadGuard,
    current: NodePtr<T>,
    _list: PhantomData<&'a LazyList<T, G>>,
}

impl<T, G: Guard> Iter<'_, T, G> {
    pub(super) fn new(guard: G::ReadGuard, first: NodePtr<T>) -> Self {
        Iter {
            _guard: guard,
            current: first,
            _list: PhantomData,
        }
    }
}

impl<T, G> Iterator for Iter<'_, T, G>
where
    T: Clone,
    G: Guard,
{
    // Values are cloned: a reference could not outlive the guard moved into
    // the iterator.
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        // Safety: the read guard keeps every node reached from HEAD alive.
        let node = unsafe { self.current.as_ref() }?;
        self.current = node.next();
        Some(node.key().clone())
    }
}
