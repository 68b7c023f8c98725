//! Iterators over the live entries of an `OpenMap`.
//!
//! All of them walk buckets in ascending physical order. That order is
//! neither insertion order nor stable across growth. Borrowing iterators
//! hold a traversal guard for their whole lifetime.

use core::iter::{FusedIterator, Zip};
use core::slice;
use std::vec;

use crate::reentrancy::TraversalGuard;

/// Iterator over `(&K, &V)`. Created by [`OpenMap::iter`](crate::OpenMap::iter).
pub struct Iter<'a, K, V> {
    cells: Zip<slice::Iter<'a, Option<K>>, slice::Iter<'a, Option<V>>>,
    remaining: usize,
    _guard: TraversalGuard<'a>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(
        cells: Zip<slice::Iter<'a, Option<K>>, slice::Iter<'a, Option<V>>>,
        len: usize,
        guard: TraversalGuard<'a>,
    ) -> Self {
        Self {
            cells,
            remaining: len,
            _guard: guard,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for cell in self.cells.by_ref() {
            if let (Some(k), Some(v)) = cell {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)`. Created by [`OpenMap::iter_mut`](crate::OpenMap::iter_mut).
pub struct IterMut<'a, K, V> {
    cells: Zip<slice::Iter<'a, Option<K>>, slice::IterMut<'a, Option<V>>>,
    remaining: usize,
    _guard: TraversalGuard<'a>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(
        cells: Zip<slice::Iter<'a, Option<K>>, slice::IterMut<'a, Option<V>>>,
        len: usize,
        guard: TraversalGuard<'a>,
    ) -> Self {
        Self {
            cells,
            remaining: len,
            _guard: guard,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for cell in self.cells.by_ref() {
            if let (Some(k), Some(v)) = cell {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over `(K, V)`. Created by `OpenMap::into_iter`.
pub struct IntoIter<K, V> {
    cells: Zip<vec::IntoIter<Option<K>>, vec::IntoIter<Option<V>>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(
        cells: Zip<vec::IntoIter<Option<K>>, vec::IntoIter<Option<V>>>,
        len: usize,
    ) -> Self {
        Self {
            cells,
            remaining: len,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for cell in self.cells.by_ref() {
            if let (Some(k), Some(v)) = cell {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Iterator over keys. Created by [`OpenMap::keys`](crate::OpenMap::keys).
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over values. Created by [`OpenMap::values`](crate::OpenMap::values).
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Iterator over mutable values. Created by [`OpenMap::values_mut`](crate::OpenMap::values_mut).
pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
