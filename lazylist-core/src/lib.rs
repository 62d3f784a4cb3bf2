//! A concurrent sorted set on a lazily synchronized linked list.
//!
//! Reads (`contains`, `range`, `len`) never lock. `insert` and `delete` lock
//! one or two neighbouring nodes, validate, and retry on conflict. Unlinked
//! nodes are handed to a [`Guard`] that frees them once no reader can still
//! hold them.
//!
//! # Usage
//!
//! ```
//! use lazylist_core::{DeferredGuard, LazyList};
//!
//! let list: LazyList<i64, DeferredGuard> = LazyList::new();
//! assert!(list.insert(5));
//! assert!(list.insert(1));
//! assert!(!list.insert(5));
//! assert!(list.delete(&1));
//! assert_eq!(list.iter().collect::<Vec<_>>(), vec![5]);
//! ```

pub mod common_tests;
pub mod data_structures;
pub mod error;
pub mod guard;

pub use data_structures::{ConcurrentSortedSet, Iter, LazyList};
pub use error::InvariantViolation;
pub use guard::{DeferredGuard, Guard};
