//! Invariant violations reported by the list checkers.
//!
//! None of the list operations fail; these errors only come out of
//! [`LazyList::check_invariants`](crate::LazyList::check_invariants) and
//! [`LazyList::check_quiescent`](crate::LazyList::check_quiescent). Seeing one
//! means the locking or validation protocol is broken.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The head sentinel was marked deleted.
    #[error("head sentinel is marked deleted")]
    MarkedSentinel,

    /// Live keys are not strictly ascending at this chain position (0 is the
    /// first node after the sentinel).
    #[error("live keys not strictly ascending at position {position}")]
    Unsorted { position: usize },

    /// A marked node is still linked although no operation is in flight.
    #[error("marked node still reachable at position {position}")]
    MarkedNodeReachable { position: usize },

    /// The approximate counter disagrees with the chain after quiescence.
    #[error("len() reports {reported} but {counted} nodes are linked")]
    LenMismatch { counted: usize, reported: usize },
}

pub type Result<T> = std::result::Result<T, InvariantViolation>;
