//! OpenMap: the public open-addressing map.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;

use crate::error::MapError;
use crate::growth::{normalize_capacity, GrowthPolicy, MIN_CAPACITY};
use crate::hash::DefaultHashBuilder;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::reentrancy::DebugReentrancy;
use crate::table::RawTable;

/// A single-threaded hash map using open addressing with linear probing.
///
/// Removal leaves a tombstone so that probe chains running through the
/// bucket stay intact. Tombstones are reclaimed only when the table is
/// rebuilt, which happens once occupied buckets plus tombstones exceed the
/// growth policy's trigger (half the capacity by default). Capacity never
/// shrinks.
///
/// Iteration visits buckets in physical order; that order is unrelated to
/// insertion order and changes when the table grows.
pub struct OpenMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    table: RawTable<K, V>,
    reentrancy: DebugReentrancy,
}

impl<K, V> OpenMap<K, V> {
    /// An empty map with `MIN_CAPACITY` buckets.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// An empty map with at least `capacity` buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` rounds past the largest supported table; see
    /// [`try_with_capacity`](Self::try_with_capacity).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, MapError> {
        Self::try_with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for OpenMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> OpenMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(hasher, MIN_CAPACITY, GrowthPolicy::default())
    }

    /// # Panics
    ///
    /// Panics with "capacity overflow" on a hint that cannot be rounded to a
    /// supported power of two.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        match Self::try_with_capacity_and_hasher(capacity, hasher) {
            Ok(map) => map,
            Err(_) => panic!("capacity overflow"),
        }
    }

    /// Like [`with_capacity_and_hasher`](Self::with_capacity_and_hasher) but
    /// reports an oversized hint as [`MapError::InvalidCapacity`].
    pub fn try_with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, MapError> {
        let capacity = normalize_capacity(capacity)?;
        Ok(Self::from_parts(hasher, capacity, GrowthPolicy::default()))
    }

    /// An empty map with a custom growth policy.
    pub fn with_policy(
        capacity: usize,
        policy: GrowthPolicy,
        hasher: S,
    ) -> Result<Self, MapError> {
        let capacity = normalize_capacity(capacity)?;
        Ok(Self::from_parts(hasher, capacity, policy))
    }

    fn from_parts(hasher: S, capacity: usize, policy: GrowthPolicy) -> Self {
        Self {
            hasher,
            table: RawTable::new(capacity, policy),
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of buckets; always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Buckets holding a tombstone, awaiting the next rebuild.
    pub fn tombstones(&self) -> usize {
        self.table.tombstones()
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.table.policy()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    #[cfg(test)]
    pub(crate) fn validate(&self) {
        self.table.validate();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(
            self.table.slots().cells(),
            self.table.len(),
            self.reentrancy.traverse(),
        )
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let len = self.table.len();
        IterMut::new(
            self.table.slots_mut().cells_mut(),
            len,
            self.reentrancy.traverse(),
        )
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Call `f` on every entry in bucket order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    /// Collect `f` applied to every entry, in bucket order.
    pub fn map_entries<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&K, &V) -> T,
    {
        self.iter().map(|(k, v)| f(k, v)).collect()
    }

    /// Remove every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        let old = {
            let _g = self.reentrancy.enter_mut();
            self.table.reset()
        };
        log::trace!("open map cleared {} buckets", old.capacity());
        // Entries drop after the guard is released; their destructors may
        // read the map again.
        drop(old);
    }

    /// Keep only the entries for which `keep` returns true. Rejected entries
    /// become tombstones.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let _g = self.reentrancy.enter_mut();
        self.table.retain(keep);
    }
}

impl<K, V, S> OpenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        self.table.find(hash, |k| q.eq(k.borrow()))
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(q)?;
        self.table.slots().value(i)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(q)?;
        self.table.slots().entry(i)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(q)?;
        self.table.slots_mut().value_mut(i)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// The value for `q`, or `default` when absent. Never inserts.
    pub fn get_or<'a, Q>(&'a self, q: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).unwrap_or(default)
    }

    /// The value for `q`, or [`MapError::NotFound`].
    pub fn lookup<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(MapError::NotFound)
    }

    /// Insert or overwrite. An existing key keeps its bucket and key; the
    /// previous value is returned. A new key takes the first tombstone on
    /// its probe path, or the Empty bucket that ended it.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter_mut();
        let hash = self.make_hash(&key);
        match self.table.locate(hash, |k| *k == key) {
            Ok(i) => self
                .table
                .slots_mut()
                .value_mut(i)
                .map(|slot| mem::replace(slot, value)),
            Err(vacancy) => {
                self.table.insert_at(vacancy, hash, key, value);
                None
            }
        }
    }

    /// The value for `key`, inserting `default` first if it is absent.
    ///
    /// One probe serves both the lookup and the insertion; if the insertion
    /// triggers growth the returned reference follows the entry to its new
    /// bucket.
    pub fn get_or_insert(&mut self, key: K, default: V) -> &mut V {
        self.get_or_insert_with(key, || default)
    }

    /// Like [`get_or_insert`](Self::get_or_insert), building the value only
    /// on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter_mut();
        let hash = self.make_hash(&key);
        let i = match self.table.locate(hash, |k| *k == key) {
            Ok(i) => i,
            Err(vacancy) => self.table.insert_at(vacancy, hash, key, default()),
        };
        self.table
            .slots_mut()
            .value_mut(i)
            .expect("located bucket is occupied")
    }

    /// Remove `q`, reporting whether it was present.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }

    /// Remove `q`, returning the owned key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter_mut();
        let hash = self.make_hash(q);
        let i = self.table.find(hash, |k| q.eq(k.borrow()))?;
        self.table.remove_at(i)
    }
}

impl<K, V, S, Q> Index<&Q> for OpenMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found")
    }
}

/// Two maps are equal when they hold the same keys mapped to equal values.
/// Capacity, bucket layout and tombstones are ignored.
impl<K, V, S> PartialEq for OpenMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| v == ov))
    }
}

impl<K, V, S> Eq for OpenMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Clone for OpenMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            table: self.table.clone(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OpenMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for OpenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for OpenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for OpenMap<K, V>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V, S> IntoIterator for &'a OpenMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OpenMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for OpenMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        let len = self.table.len();
        IntoIter::new(self.table.into_slots().into_cells(), len)
    }
}
