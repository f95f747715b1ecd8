//! chained-hashset: a single-threaded unordered set built on separate
//! chaining, with doubling growth and snapshot iteration.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a set whose every operation is a slot computation followed by
//!   a linear scan of one chain, with growth that rebuilds the whole
//!   bucket array in one step.
//! - Pieces:
//!   - `index`: digest (the `BuildHasher` output read as `i64`) and the
//!     fold `|digest rem len|` into `[0, len)`, overflow-free for every
//!     digest including `i64::MIN`.
//!   - `ChainedHashSet<T, S>`: bucket array of chains. Elements live in a
//!     slot arena; chains hold arena keys. Buckets are allocated on first
//!     insert into their slot.
//!   - `Snapshot<T>`: owned copy of the elements taken at construction,
//!     walked by a cursor; later mutation of the set is not observed.
//!   - `SetConfig`: initial capacity and load-factor threshold, validated
//!     at construction.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` (no atomics, no locks).
//! - Uniqueness by `T: Eq`; the digest only selects the chain.
//! - Capacity is positive and only doubles; removal never shrinks it.
//! - Growth is decided before placing a new element: when
//!   `len / capacity >= load_factor` the array doubles and every element's
//!   slot is re-derived from its digest against the new length.
//! - Digests are never cached; `T: Hash` runs on every lookup and once per
//!   element during a rehash.
//!
//! Reentrancy policy
//! - Structural entry points take a debug-only guard. User `Eq`/`Hash`/
//!   `Clone` code that calls back into the same set while the guard is
//!   held panics in debug builds, naming both operations.
//! - Removed elements are returned or dropped only after the set is
//!   consistent again, so their `Drop` may use the set.
//!
//! Notes and non-goals
//! - Element contract violations (equal elements with different digests)
//!   are not detected; lookups may miss and duplicates may appear.
//! - No ordering guarantee beyond "bucket order, then chain order".
//! - No shrinking, no custom growth factor.

mod chained_hash_set;
mod chained_hash_set_proptest;
mod config;
mod index;
mod reentrancy;
mod snapshot;

// Public surface
pub use chained_hash_set::{ChainedHashSet, Iter};
pub use config::{ConfigError, SetConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use snapshot::{Exhausted, Snapshot};
