//! Internal implementation details.
//!
//! These are pub(crate) and not intended for external use.

pub mod retry;

pub(crate) use retry::{Attempt, retry};
