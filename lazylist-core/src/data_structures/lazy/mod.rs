//! Lazy-synchronization sorted list.
//!
//! Lock-free reads, per-node locks for writes, logical deletion before
//! physical unlinking.

mod iter;
mod lazy_list;
mod node;

pub use iter::Iter;
pub use lazy_list::LazyList;
