//! Debug-only misuse detection for `OpenMap`.
//!
//! Two kinds of section are tracked per map instance:
//! - a *critical* section, held while a probe or mutation runs and user
//!   `Eq`/`Hash` code may execute; nothing may enter the map while it is held.
//! - a *traversal* section, held by live iterators and `for_each`/`map_entries`
//!   callbacks; reads may nest inside it, mutation may not.
//!
//! In release builds every guard is a zero-sized no-op.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    critical: Cell<bool>,
    #[cfg(debug_assertions)]
    traversals: Cell<u32>,
    // The map is single-threaded in every build profile.
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            critical: Cell::new(false),
            #[cfg(debug_assertions)]
            traversals: Cell::new(0),
            _nosend: PhantomData,
        }
    }

    /// Enter a read-only critical section. Allowed inside a traversal.
    #[inline]
    pub(crate) fn enter(&self) -> CriticalGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.critical.get(),
                "reentrancy detected: nested entry into map while probing"
            );
            self.critical.set(true);
            CriticalGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            CriticalGuard { _z: PhantomData }
        }
    }

    /// Enter a mutating critical section. Rejected while any traversal is live.
    #[inline]
    pub(crate) fn enter_mut(&self) -> CriticalGuard<'_> {
        #[cfg(debug_assertions)]
        assert!(
            self.traversals.get() == 0,
            "reentrancy detected: map mutated during traversal"
        );
        self.enter()
    }

    /// Open a traversal section for the lifetime of the returned guard.
    #[inline]
    pub(crate) fn traverse(&self) -> TraversalGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.critical.get(),
                "reentrancy detected: traversal started while probing"
            );
            self.traversals.set(self.traversals.get() + 1);
            TraversalGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            TraversalGuard { _z: PhantomData }
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct CriticalGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for CriticalGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.critical.get());
            self.owner.critical.set(false);
        }
    }
}

pub(crate) struct TraversalGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for TraversalGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let n = self.owner.traversals.get();
            debug_assert!(n > 0);
            self.owner.traversals.set(n - 1);
        }
    }
}
