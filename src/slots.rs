//! SlotArrays: the flat, parallel storage behind `OpenMap`.
//!
//! Index `i` of every array describes the same physical bucket. A bucket is
//! in exactly one of three states; only `Occupied` buckets hold a key and a
//! value, and their stored hash is the one computed at insertion.

use core::iter::Zip;
use core::slice;

/// Per-bucket state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Status {
    Empty,
    Occupied,
    Tombstone,
}

#[derive(Debug)]
pub(crate) struct SlotArrays<K, V> {
    status: Box<[Status]>,
    hashes: Box<[u64]>,
    keys: Box<[Option<K>]>,
    values: Box<[Option<V>]>,
}

impl<K, V> SlotArrays<K, V> {
    /// Allocate `capacity` empty buckets. `capacity` must be a power of two.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            status: vec![Status::Empty; capacity].into_boxed_slice(),
            hashes: vec![0; capacity].into_boxed_slice(),
            keys: (0..capacity).map(|_| None).collect(),
            values: (0..capacity).map(|_| None).collect(),
        }
    }

    /// Zero-bucket placeholder that owns no allocation. Only ever held while
    /// the real arrays are moved out for a rehash.
    pub(crate) fn detached() -> Self {
        Self {
            status: Box::new([]),
            hashes: Box::new([]),
            keys: Box::new([]),
            values: Box::new([]),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.status.len()
    }

    #[inline]
    pub(crate) fn mask(&self) -> usize {
        self.status.len() - 1
    }

    #[inline]
    pub(crate) fn status(&self, i: usize) -> Status {
        self.status[i]
    }

    #[inline]
    pub(crate) fn hash(&self, i: usize) -> u64 {
        self.hashes[i]
    }

    /// Key stored in bucket `i`, if it is occupied.
    #[inline]
    pub(crate) fn key(&self, i: usize) -> Option<&K> {
        self.keys[i].as_ref()
    }

    #[inline]
    pub(crate) fn value(&self, i: usize) -> Option<&V> {
        self.values[i].as_ref()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, i: usize) -> Option<&mut V> {
        self.values[i].as_mut()
    }

    #[inline]
    pub(crate) fn entry(&self, i: usize) -> Option<(&K, &V)> {
        match (&self.keys[i], &self.values[i]) {
            (Some(k), Some(v)) => Some((k, v)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, i: usize) -> Option<(&K, &mut V)> {
        match (&self.keys[i], &mut self.values[i]) {
            (Some(k), Some(v)) => Some((k, v)),
            _ => None,
        }
    }

    /// Fill an Empty or Tombstone bucket.
    pub(crate) fn occupy(&mut self, i: usize, hash: u64, key: K, value: V) {
        debug_assert_ne!(self.status[i], Status::Occupied);
        self.status[i] = Status::Occupied;
        self.hashes[i] = hash;
        self.keys[i] = Some(key);
        self.values[i] = Some(value);
    }

    /// Turn an occupied bucket into a tombstone, handing back its pair.
    pub(crate) fn vacate(&mut self, i: usize) -> Option<(K, V)> {
        if self.status[i] != Status::Occupied {
            return None;
        }
        self.status[i] = Status::Tombstone;
        self.hashes[i] = 0;
        match (self.keys[i].take(), self.values[i].take()) {
            (Some(k), Some(v)) => Some((k, v)),
            _ => None,
        }
    }

    /// Move the pair out of bucket `i`, leaving it Empty. Only used while the
    /// whole array set is being torn down (rehash, owning iteration).
    pub(crate) fn take(&mut self, i: usize) -> Option<(u64, K, V)> {
        if self.status[i] != Status::Occupied {
            return None;
        }
        self.status[i] = Status::Empty;
        match (self.keys[i].take(), self.values[i].take()) {
            (Some(k), Some(v)) => Some((self.hashes[i], k, v)),
            _ => None,
        }
    }

    /// Key/value cells in bucket order; `Some` pairs are the occupied buckets.
    pub(crate) fn cells(&self) -> Zip<slice::Iter<'_, Option<K>>, slice::Iter<'_, Option<V>>> {
        self.keys.iter().zip(self.values.iter())
    }

    pub(crate) fn cells_mut(
        &mut self,
    ) -> Zip<slice::Iter<'_, Option<K>>, slice::IterMut<'_, Option<V>>> {
        self.keys.iter().zip(self.values.iter_mut())
    }

    pub(crate) fn into_cells(
        self,
    ) -> Zip<std::vec::IntoIter<Option<K>>, std::vec::IntoIter<Option<V>>> {
        self.keys.into_vec().into_iter().zip(self.values.into_vec())
    }

    /// Count buckets in each state: `(occupied, tombstones)`.
    pub(crate) fn census(&self) -> (usize, usize) {
        self.status.iter().fold((0, 0), |(o, t), s| match s {
            Status::Occupied => (o + 1, t),
            Status::Tombstone => (o, t + 1),
            Status::Empty => (o, t),
        })
    }
}

impl<K: Clone, V: Clone> Clone for SlotArrays<K, V> {
    fn clone(&self) -> Self {
        Self {
            status: self.status.clone(),
            hashes: self.hashes.clone(),
            keys: self.keys.clone(),
            values: self.values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_arrays_are_all_empty() {
        let s: SlotArrays<u32, u32> = SlotArrays::new(8);
        assert_eq!(s.capacity(), 8);
        assert_eq!(s.mask(), 7);
        assert_eq!(s.census(), (0, 0));
        assert!((0..8).all(|i| s.status(i) == Status::Empty && s.key(i).is_none()));
    }

    #[test]
    fn occupy_vacate_reuse_cycle() {
        let mut s: SlotArrays<&str, i32> = SlotArrays::new(8);
        s.occupy(3, 0xabc, "k", 1);
        assert_eq!(s.status(3), Status::Occupied);
        assert_eq!(s.hash(3), 0xabc);
        assert_eq!(s.entry(3), Some((&"k", &1)));

        assert_eq!(s.vacate(3), Some(("k", 1)));
        assert_eq!(s.status(3), Status::Tombstone);
        assert!(s.entry(3).is_none());
        assert_eq!(s.census(), (0, 1));
        // Vacating twice is a no-op.
        assert_eq!(s.vacate(3), None);

        s.occupy(3, 0xdef, "j", 2);
        assert_eq!(s.census(), (1, 0));
        *s.value_mut(3).unwrap() += 40;
        assert_eq!(s.value(3), Some(&42));
    }

    #[test]
    fn take_empties_the_bucket() {
        let mut s: SlotArrays<u8, u8> = SlotArrays::new(8);
        s.occupy(0, 9, 1, 2);
        assert_eq!(s.take(0), Some((9, 1, 2)));
        assert_eq!(s.status(0), Status::Empty);
        assert_eq!(s.take(0), None);
    }
}
