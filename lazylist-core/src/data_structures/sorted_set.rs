/// A sorted set safe to share between threads.
///
/// Every method takes `&self`. Mutations report whether they changed the set;
/// `false` is an ordinary outcome, not an error.
///
pub trait ConcurrentSortedSet<T: Ord> {
    /// Check if a value is in the set. Never blocks.
    ///
    fn contains(&self, key: &T) -> bool;

    /// Insert a value.
    ///
    /// Returns `true` if the value was added, `false` if it was already there.
    ///
    fn insert(&self, key: T) -> bool;

    /// Remove a value.
    ///
    /// Returns `true` if the value was removed, `false` if it was not there.
    ///
    fn delete(&self, key: &T) -> bool;

    /// Visit values in ascending order until `visit` returns `false`.
    ///
    /// Weakly consistent: a value deleted concurrently may still be visited.
    ///
    fn range<F>(&self, visit: F)
    where
        F: FnMut(&T) -> bool;

    /// Approximate number of values. Exact once no operation is in flight.
    ///
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collects all visited values into a Vec.
    ///
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut result = Vec::new();
        self.range(|key| {
            result.push(key.clone());
            true
        });
        result
    }
}
