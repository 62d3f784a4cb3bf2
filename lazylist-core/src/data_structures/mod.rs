//! Data structures for concurrent sets.
//!
//! # Organization
//!
//! - [`lazy`] - Lazy-synchronization sorted list (LazyList)
//! - [`sorted_set`] - The set trait every implementation provides
//! - [`internal`] - Internal implementation details (pub(crate))

pub(crate) mod internal;
pub mod lazy;
pub mod sorted_set;

pub use lazy::{Iter, LazyList};
pub use sorted_set::ConcurrentSortedSet;
