// Optimistic retry loop shared by the mutating list operations.
//
// An attempt searches without locks, locks its neighborhood, validates it and
// then either commits or gives its input back. Every lock an attempt takes is
// released before the attempt returns, so nothing is held across the restart.
//

/// Outcome of one optimistic attempt.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Attempt<S, R> {
    /// Validation succeeded (or no locking was needed); the result is final.
    Commit(R),
    /// Validation failed; restart from the top with the returned input.
    Retry(S),
}

/// Run `attempt` until it commits.
///
/// There is no bound on the number of attempts and no way to cancel between
/// them.
pub(crate) fn retry<S, R>(mut state: S, mut attempt: impl FnMut(S) -> Attempt<S, R>) -> R {
    let mut attempts: u64 = 1;
    loop {
        match attempt(state) {
            Attempt::Commit(result) => return result,
            Attempt::Retry(input) => {
                tracing::trace!(attempt = attempts, "neighborhood validation failed, restarting");
                attempts += 1;
                state = input;
            }
        }
    }
}
