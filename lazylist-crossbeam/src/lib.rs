//! Crossbeam-based reclamation for lazylist collections.
//!
//! This crate provides `EpochGuard`, an implementation of the `Guard` trait
//! using crossbeam-epoch for memory reclamation.
//!
//! # Usage
//!
//! ```
//! use lazylist_core::LazyList;
//! use lazylist_crossbeam::EpochGuard;
//!
//! let list: LazyList<i32, EpochGuard> = LazyList::new();
//! assert!(list.insert(42));
//! assert!(list.delete(&42));
//! ```

pub mod epoch_guard;

pub use epoch_guard::EpochGuard;

/// A lazy list whose unlinked nodes are reclaimed by crossbeam-epoch.
///
/// Deleted keys are dropped by the global collector, on any thread and
/// possibly after the list. Keys must therefore own their data:
///
/// ```compile_fail
/// use lazylist_crossbeam::EpochLazyList;
///
/// let owner = String::from("borrowed");
/// let list: EpochLazyList<&str> = EpochLazyList::new();
/// list.insert(owner.as_str());
/// ```
///
/// and be `Send`:
///
/// ```compile_fail
/// use std::rc::Rc;
/// use lazylist_crossbeam::EpochLazyList;
///
/// let list: EpochLazyList<Rc<i32>> = EpochLazyList::new();
/// list.insert(Rc::new(1));
/// ```
pub type EpochLazyList<T> = lazylist_core::LazyList<T, EpochGuard>;
