//! RawTable: the structural layer of `OpenMap`.
//!
//! Owns the slot arrays and the `len`/`used` counters and applies the growth
//! policy. It never hashes keys itself; callers pass the hash and an equality
//! predicate, so user code only runs inside `find`/`locate` probes.

use core::mem;

use crate::growth::{rehash, GrowthPolicy};
use crate::probe::{probe, Probe};
use crate::slots::SlotArrays;

/// Where a missing key would be inserted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Vacancy {
    index: usize,
    fresh: bool,
}

#[derive(Debug)]
pub(crate) struct RawTable<K, V> {
    slots: SlotArrays<K, V>,
    /// Occupied buckets.
    len: usize,
    /// Occupied buckets plus tombstones.
    used: usize,
    policy: GrowthPolicy,
}

impl<K, V> RawTable<K, V> {
    /// `capacity` must already be a normalized power of two.
    pub(crate) fn new(capacity: usize, policy: GrowthPolicy) -> Self {
        Self {
            slots: SlotArrays::new(capacity),
            len: 0,
            used: 0,
            policy,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline]
    pub(crate) fn tombstones(&self) -> usize {
        self.used - self.len
    }

    #[inline]
    pub(crate) fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    #[inline]
    pub(crate) fn slots(&self) -> &SlotArrays<K, V> {
        &self.slots
    }

    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut SlotArrays<K, V> {
        &mut self.slots
    }

    /// Index of the bucket holding a matching key.
    pub(crate) fn find(&self, hash: u64, is_match: impl FnMut(&K) -> bool) -> Option<usize> {
        match probe(&self.slots, hash, is_match) {
            Probe::Found(i) => Some(i),
            Probe::Vacant { .. } | Probe::Exhausted => None,
        }
    }

    /// Single probe for insert-or-lookup: `Ok(index)` on a hit, otherwise the
    /// bucket a new entry should take.
    pub(crate) fn locate(
        &mut self,
        hash: u64,
        mut is_match: impl FnMut(&K) -> bool,
    ) -> Result<usize, Vacancy> {
        loop {
            match probe(&self.slots, hash, &mut is_match) {
                Probe::Found(i) => return Ok(i),
                Probe::Vacant { index, fresh } => return Err(Vacancy { index, fresh }),
                // No Empty and no tombstone left: rebuild, then probe again.
                Probe::Exhausted => {
                    self.grow(None);
                }
            }
        }
    }

    /// Store a new entry in the bucket `locate` reported, growing afterwards
    /// if the load threshold is now exceeded. Returns the entry's final index.
    pub(crate) fn insert_at(&mut self, vacancy: Vacancy, hash: u64, key: K, value: V) -> usize {
        self.slots.occupy(vacancy.index, hash, key, value);
        self.len += 1;
        if vacancy.fresh {
            self.used += 1;
        }
        let mut at = vacancy.index;
        if self.policy.should_grow(self.used, self.slots.capacity()) {
            at = self
                .grow(Some(at))
                .expect("inserted entry survives the rehash");
        }
        self.debug_check();
        at
    }

    /// Tombstone bucket `i`, handing back its pair. `used` is unchanged.
    pub(crate) fn remove_at(&mut self, i: usize) -> Option<(K, V)> {
        let pair = self.slots.vacate(i)?;
        self.len -= 1;
        self.debug_check();
        Some(pair)
    }

    /// Swap in empty arrays of the same capacity, returning the old ones so
    /// their entries can be dropped by the caller.
    pub(crate) fn reset(&mut self) -> SlotArrays<K, V> {
        let capacity = self.slots.capacity();
        self.len = 0;
        self.used = 0;
        mem::replace(&mut self.slots, SlotArrays::new(capacity))
    }

    /// Tombstone every entry the predicate rejects.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        for i in 0..self.slots.capacity() {
            let rejected = match self.slots.entry_mut(i) {
                Some((k, v)) => !keep(k, v),
                None => false,
            };
            if rejected && self.slots.vacate(i).is_some() {
                self.len -= 1;
            }
        }
        self.debug_check();
    }

    pub(crate) fn into_slots(self) -> SlotArrays<K, V> {
        self.slots
    }

    /// Rebuild at the capacity the policy picks for the live entries.
    /// Returns where bucket `follow` ended up.
    fn grow(&mut self, follow: Option<usize>) -> Option<usize> {
        let old_capacity = self.slots.capacity();
        let capacity = self.policy.grown_capacity(self.len, old_capacity);
        log::debug!(
            "open map rehash: {} -> {} buckets, {} live, {} tombstones dropped",
            old_capacity,
            capacity,
            self.len,
            self.used - self.len
        );
        let old = mem::replace(&mut self.slots, SlotArrays::detached());
        let (fresh, followed) = rehash(old, capacity, follow);
        self.slots = fresh;
        self.used = self.len;
        followed
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.len <= self.used, "live entries exceed used buckets");
        debug_assert!(self.used <= self.slots.capacity(), "used exceeds capacity");
        debug_assert!(
            !self.policy.should_grow(self.used, self.slots.capacity()),
            "load threshold exceeded after a mutation"
        );
    }

    /// Full structural audit: counters agree with the arrays and every entry
    /// is reachable from its home bucket without crossing an Empty one.
    #[cfg(test)]
    pub(crate) fn validate(&self) {
        use crate::probe::ProbeSeq;
        use crate::slots::Status;

        let (occupied, tombstones) = self.slots.census();
        assert_eq!(occupied, self.len, "len disagrees with occupied buckets");
        assert_eq!(occupied + tombstones, self.used, "used disagrees with arrays");
        assert!(self.slots.capacity().is_power_of_two());
        assert!(!self.policy.should_grow(self.used, self.slots.capacity()));
        for i in 0..self.slots.capacity() {
            if self.slots.status(i) != Status::Occupied {
                continue;
            }
            let reached = ProbeSeq::new(self.slots.hash(i), self.slots.mask())
                .take_while(|&j| self.slots.status(j) != Status::Empty)
                .any(|j| j == i);
            assert!(reached, "bucket {i} unreachable from its home bucket");
        }
    }
}

impl<K: Clone, V: Clone> Clone for RawTable<K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
            used: self.used,
            policy: self.policy,
        }
    }
}
