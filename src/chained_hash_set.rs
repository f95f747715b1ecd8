//! ChainedHashSet: bucket array of chains over a slot arena, with
//! doubling growth and a debug reentrancy guard.

use crate::config::{ConfigError, SetConfig};
use crate::index::{digest, slot_index};
use crate::reentrancy::OpTracker;
use crate::snapshot::Snapshot;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use hashbrown::hash_map::DefaultHashBuilder;
use slotmap::{DefaultKey, SlotMap};

/// Arena keys of the elements sharing one slot, in insertion order.
type Chain = Vec<DefaultKey>;

pub struct ChainedHashSet<T, S = DefaultHashBuilder> {
    hasher: S,
    // `None` is a bucket that was never allocated; `Some(vec![])` one
    // that was emptied by removals. Both read as empty.
    buckets: Vec<Option<Chain>>,
    elems: SlotMap<DefaultKey, T>, // element storage; chains hold keys
    len: usize,
    load_factor: f64,
    reentrancy: OpTracker,
}

impl<T> ChainedHashSet<T>
where
    T: Eq + Hash,
{
    /// Empty set with 16 buckets and a 0.75 growth threshold.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_config(config: SetConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Default::default())
    }

    pub fn with_capacity_and_load_factor(
        initial_capacity: usize,
        load_factor: f64,
    ) -> Result<Self, ConfigError> {
        Self::with_config(
            SetConfig::new()
                .with_initial_capacity(initial_capacity)
                .with_load_factor(load_factor),
        )
    }
}

impl<T> Default for ChainedHashSet<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowing iterator in bucket order, then chain order.
pub struct Iter<'a, T> {
    buckets: core::slice::Iter<'a, Option<Chain>>,
    chain: core::slice::Iter<'a, DefaultKey>,
    elems: &'a SlotMap<DefaultKey, T>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(&k) = self.chain.next() {
                if let Some(e) = self.elems.get(k) {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some(e);
                }
                continue;
            }
            if let Some(chain) = self.buckets.next()? {
                self.chain = chain.iter();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<T, S> ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(SetConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: SetConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: SetConfig, hasher: S) -> Self {
        Self {
            hasher,
            buckets: empty_table(config.initial_capacity),
            elems: SlotMap::with_key(),
            len: 0,
            load_factor: config.load_factor,
            reentrancy: OpTracker::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket-array length. Only ever doubles.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    // Callers hold the reentrancy guard.
    fn locate<Q>(&self, q: &Q) -> Option<(usize, usize)>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = slot_index(digest(&self.hasher, q), self.buckets.len());
        let chain = self.buckets[slot].as_ref()?;
        let pos = chain.iter().position(|&k| {
            self.elems
                .get(k)
                .map(|e| e.borrow() == q)
                .unwrap_or(false)
        })?;
        Some((slot, pos))
    }

    fn at_threshold(&self) -> bool {
        self.len as f64 / self.buckets.len() as f64 >= self.load_factor
    }

    /// Inserts `value` unless an equal element is present. Returns whether
    /// the set changed. Growth is decided before the element is placed.
    pub fn add(&mut self, value: T) -> bool {
        let _g = self.reentrancy.enter("add");
        if self.locate(&value).is_some() {
            return false;
        }
        if self.at_threshold() {
            let grown = self.buckets.len() * 2;
            self.buckets = rehashed(&self.hasher, &self.elems, &self.buckets, grown);
        }
        let slot = slot_index(digest(&self.hasher, &value), self.buckets.len());
        let k = self.elems.insert(value);
        self.buckets[slot].get_or_insert_with(Vec::new).push(k);
        self.len += 1;
        true
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains");
        self.locate(q).is_some()
    }

    /// The stored element equal to `q`, not `q` itself.
    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let (slot, pos) = self.locate(q)?;
        let k = *self.buckets[slot].as_ref()?.get(pos)?;
        self.elems.get(k)
    }

    /// Unlinks and returns the stored element equal to `q`.
    pub fn take<Q>(&mut self, q: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove");
        let (slot, pos) = self.locate(q)?;
        let k = self.buckets[slot].as_mut()?.remove(pos);
        self.len -= 1;
        self.elems.remove(k)
    }

    /// Removes the element equal to `q`; the removed element is dropped
    /// after the set is consistent again.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(q).is_some()
    }

    /// Drops every element. Capacity is kept.
    pub fn clear(&mut self) {
        let dropped = {
            let _g = self.reentrancy.enter("clear");
            for bucket in &mut self.buckets {
                *bucket = None;
            }
            self.len = 0;
            core::mem::replace(&mut self.elems, SlotMap::with_key())
        };
        drop(dropped);
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buckets: self.buckets.iter(),
            chain: <&[DefaultKey]>::default().iter(),
            elems: &self.elems,
            remaining: self.len,
        }
    }

    /// Copies every element out so later mutation of the set does not
    /// affect the returned cursor.
    pub fn snapshot(&self) -> Snapshot<T>
    where
        T: Clone,
    {
        let _g = self.reentrancy.enter("snapshot");
        let mut items = Vec::with_capacity(self.len);
        items.extend(self.iter().cloned());
        Snapshot::new(items)
    }

    /// Panics unless every element sits in the slot its digest maps to,
    /// the counter matches the chains, and no two chained elements are equal.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut chained = 0;
        for (slot, bucket) in self.buckets.iter().enumerate() {
            let chain = match bucket {
                Some(c) => c,
                None => continue,
            };
            for (i, &k) in chain.iter().enumerate() {
                let e = self.elems.get(k).expect("chain key resolves");
                assert_eq!(slot_index(digest(&self.hasher, e), self.buckets.len()), slot);
                for &other in &chain[i + 1..] {
                    assert!(self.elems.get(other).expect("chain key resolves") != e);
                }
                chained += 1;
            }
        }
        assert_eq!(chained, self.len);
        assert_eq!(self.elems.len(), self.len);
    }
}

fn empty_table(len: usize) -> Vec<Option<Chain>> {
    let mut table = Vec::with_capacity(len);
    table.resize_with(len, || None);
    table
}

// Builds a `len`-slot table, re-deriving each element's slot from its
// digest. Old chains are walked in order so relative order is kept.
fn rehashed<T, S>(
    hasher: &S,
    elems: &SlotMap<DefaultKey, T>,
    old: &[Option<Chain>],
    len: usize,
) -> Vec<Option<Chain>>
where
    T: Hash,
    S: BuildHasher,
{
    let mut table = empty_table(len);
    for &k in old.iter().flatten().flatten() {
        if let Some(e) = elems.get(k) {
            let slot = slot_index(digest(hasher, e), len);
            table[slot].get_or_insert_with(Vec::new).push(k);
        }
    }
    table
}

impl<'a, T, S> IntoIterator for &'a ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, S> Extend<T> for ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T, S> FromIterator<T> for ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T, S> fmt::Debug for ChainedHashSet<T, S>
where
    T: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
