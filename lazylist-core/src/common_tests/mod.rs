//! Test bodies shared by every set implementation and guard.
//!
//! Each function is generic over [`ConcurrentSortedSet`] so integration tests
//! can run the same body against `LazyList<_, DeferredGuard>` and
//! `LazyList<_, EpochGuard>`.
//!
//! [`ConcurrentSortedSet`]: crate::data_structures::ConcurrentSortedSet
