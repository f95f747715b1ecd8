//! Snapshot iteration: elements are cloned out of the set when the
//! snapshot is built and later traversal walks that owned copy.

use core::fmt;
use core::iter::FusedIterator;

/// Returned by `Snapshot::next_element` once every element was yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted;

impl fmt::Display for Exhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("snapshot iterator is exhausted")
    }
}

impl std::error::Error for Exhausted {}

/// Single-pass cursor over the elements a set held when
/// `ChainedHashSet::snapshot` was called, in bucket order then chain
/// order. Later changes to the set are not reflected.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    rest: std::vec::IntoIter<T>,
}

impl<T> Snapshot<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        Self {
            rest: items.into_iter(),
        }
    }

    pub fn has_next(&self) -> bool {
        !self.rest.as_slice().is_empty()
    }

    /// Advances the cursor, failing with `Exhausted` past the end.
    pub fn next_element(&mut self) -> Result<T, Exhausted> {
        self.rest.next().ok_or(Exhausted)
    }

    /// Elements not yet yielded.
    pub fn remaining(&self) -> &[T] {
        self.rest.as_slice()
    }
}

impl<T> Iterator for Snapshot<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.rest.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rest.size_hint()
    }
}

impl<T> ExactSizeIterator for Snapshot<T> {}
impl<T> FusedIterator for Snapshot<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_in_order_then_reports_exhaustion() {
        let mut s = Snapshot::new(vec![3, 1, 2]);
        assert_eq!(s.len(), 3);
        assert!(s.has_next());
        assert_eq!(s.next_element(), Ok(3));
        assert_eq!(s.remaining(), &[1, 2]);
        assert_eq!(s.next_element(), Ok(1));
        assert_eq!(s.next_element(), Ok(2));
        assert!(!s.has_next());
        assert_eq!(s.next_element(), Err(Exhausted));
        // Stays exhausted.
        assert_eq!(s.next_element(), Err(Exhausted));
        assert_eq!(s.next(), None);
    }

    #[test]
    fn empty_snapshot() {
        let mut s: Snapshot<String> = Snapshot::new(Vec::new());
        assert!(!s.has_next());
        assert_eq!(s.next_element(), Err(Exhausted));
        assert_eq!(Exhausted.to_string(), "snapshot iterator is exhausted");
    }
}
