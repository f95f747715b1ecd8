//! Debug-only reentrancy guard.
//!
//! `ChainedHashSet` calls into user code (`T: Eq`, `T: Hash`) while a
//! chain is being scanned or the bucket array is being rebuilt. A user
//! impl that calls back into the same set at that point would observe a
//! half-built table. In debug builds the guard panics on such a nested
//! call and names both operations. In release builds it compiles away.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-set tracker. Structural entry points start with
/// `let _g = self.reentrancy.enter("op");`.
#[derive(Debug)]
pub(crate) struct OpTracker {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Single-threaded: keep !Send + !Sync.
    _nosend: PhantomData<*mut ()>,
}

impl OpTracker {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosend: PhantomData,
        }
    }

    /// Marks `op` as in flight until the returned guard drops.
    #[inline]
    #[cfg_attr(not(debug_assertions), allow(unused_variables))]
    pub(crate) fn enter(&self, op: &'static str) -> OpGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!(
                    "reentrant call to `{}` while `{}` is in progress on the same set",
                    op, outer
                );
            }
            self.active.set(Some(op));
            OpGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            OpGuard { _z: PhantomData }
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

impl Default for OpTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `OpTracker::enter`.
pub(crate) struct OpGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a OpTracker,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for OpGuard<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OpTracker;

    #[test]
    fn sequential_entries_are_ok() {
        let t = OpTracker::new();
        {
            let _g = t.enter("add");
        }
        let _g = t.enter("contains");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn guard_clears_on_drop() {
        let t = OpTracker::new();
        {
            let _g = t.enter("remove");
            assert_eq!(t.active(), Some("remove"));
        }
        assert_eq!(t.active(), None);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_with_both_names() {
        let t = OpTracker::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g1 = t.enter("add");
            let _g2 = t.enter("contains");
        }));
        let err = res.expect_err("expected reentrancy to panic in debug builds");
        let msg = err
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(msg.contains("`contains`"), "message: {}", msg);
        assert!(msg.contains("`add`"), "message: {}", msg);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_noop_in_release() {
        let t = OpTracker::new();
        let _g1 = t.enter("add");
        let _g2 = t.enter("contains");
    }
}
