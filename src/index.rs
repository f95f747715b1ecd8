//! Digest computation and slot folding.
//!
//! A digest is the `BuildHasher` output reinterpreted as a signed 64-bit
//! integer. Slots are `|digest rem len|`, computed with `unsigned_abs` so
//! `i64::MIN` (or any remainder at the negative extreme) cannot overflow.

use core::hash::{BuildHasher, Hash};

#[inline]
pub(crate) fn digest<S, Q>(hasher: &S, q: &Q) -> i64
where
    S: BuildHasher,
    Q: ?Sized + Hash,
{
    hasher.hash_one(q) as i64
}

/// Maps `digest` into `[0, len)`. `len` must be non-zero.
#[inline]
pub(crate) fn slot_index(digest: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    let len = len as u64;
    if len > i64::MAX as u64 {
        // Remainder would not fit in i64; fold on the unsigned width.
        return ((digest as u64) % len) as usize;
    }
    (digest % len as i64).unsigned_abs() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_digests_are_plain_remainders() {
        assert_eq!(slot_index(0, 16), 0);
        assert_eq!(slot_index(5, 16), 5);
        assert_eq!(slot_index(37, 16), 5);
        assert_eq!(slot_index(37, 1), 0);
    }

    #[test]
    fn negative_digests_fold_by_magnitude() {
        assert_eq!(slot_index(-5, 16), 5);
        assert_eq!(slot_index(-37, 16), 5);
        assert_eq!(slot_index(-1, 3), 1);
    }

    #[test]
    fn extreme_digests_do_not_overflow() {
        assert_eq!(slot_index(i64::MIN, 16), 0);
        assert_eq!(slot_index(i64::MIN, 3), 2);
        assert_eq!(slot_index(i64::MIN + 1, 7), (i64::MAX % 7) as usize);
        assert!(slot_index(i64::MAX, 10) < 10);
        assert!(slot_index(i64::MIN, usize::MAX) < usize::MAX);
    }

    #[test]
    fn every_slot_is_in_range() {
        for len in 1..40usize {
            for d in [-1000i64, -17, -1, 0, 1, 17, 1000, i64::MIN, i64::MAX] {
                assert!(slot_index(d, len) < len);
            }
        }
    }
}
