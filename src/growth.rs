//! Growth policy: when to reallocate, how large, and the rehash itself.
//!
//! Load is measured as `used / capacity`, where `used` counts occupied buckets
//! and tombstones alike, since both lengthen probes. Once an insertion pushes
//! load past `max_load`, the table is rebuilt at the smallest power of two
//! that brings the live entries down to `target_load`. Capacity never
//! shrinks; a rebuild at the current size only purges tombstones.

use crate::error::MapError;
use crate::probe::first_free;
use crate::slots::SlotArrays;

/// Smallest bucket count a map ever holds.
pub const MIN_CAPACITY: usize = 8;

/// Largest bucket count a map may be asked for.
pub const MAX_CAPACITY: usize = 1 << (usize::BITS - 2);

/// A load ratio `num / den`, kept as integers so the comparison is exact.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LoadFactor {
    num: usize,
    den: usize,
}

impl LoadFactor {
    /// A ratio strictly between 0 and 1.
    pub fn new(num: usize, den: usize) -> Result<Self, MapError> {
        let invalid = |reason| MapError::InvalidLoadFactor { num, den, reason };
        if den == 0 {
            return Err(invalid("denominator is zero"));
        }
        if num == 0 {
            return Err(invalid("ratio must be positive"));
        }
        if num >= den {
            return Err(invalid("ratio must be below one"));
        }
        Ok(Self { num, den })
    }

    pub const fn num(&self) -> usize {
        self.num
    }

    pub const fn den(&self) -> usize {
        self.den
    }

    /// `count / capacity > num / den`
    #[inline]
    pub fn is_exceeded_by(&self, count: usize, capacity: usize) -> bool {
        (count as u128) * (self.den as u128) > (capacity as u128) * (self.num as u128)
    }

    fn is_below(&self, other: &LoadFactor) -> bool {
        (self.num as u128) * (other.den as u128) < (other.num as u128) * (self.den as u128)
    }
}

/// Thresholds driving growth. Defaults to a trigger at 1/2 and a
/// post-growth target of 1/4.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GrowthPolicy {
    max_load: LoadFactor,
    target_load: LoadFactor,
}

impl GrowthPolicy {
    /// `target_load` must be strictly below `max_load`.
    pub fn new(max_load: LoadFactor, target_load: LoadFactor) -> Result<Self, MapError> {
        if !target_load.is_below(&max_load) {
            return Err(MapError::InvalidLoadFactor {
                num: target_load.num,
                den: target_load.den,
                reason: "target load must be below the growth trigger",
            });
        }
        Ok(Self {
            max_load,
            target_load,
        })
    }

    pub const fn max_load(&self) -> LoadFactor {
        self.max_load
    }

    pub const fn target_load(&self) -> LoadFactor {
        self.target_load
    }

    #[inline]
    pub(crate) fn should_grow(&self, used: usize, capacity: usize) -> bool {
        self.max_load.is_exceeded_by(used, capacity)
    }

    /// Capacity to rebuild at: the smallest power of two, no smaller than
    /// `current`, holding `live` entries at or below the target load.
    ///
    /// # Panics
    ///
    /// Panics with "capacity overflow" past `MAX_CAPACITY`.
    pub(crate) fn grown_capacity(&self, live: usize, current: usize) -> usize {
        let mut capacity = current.max(MIN_CAPACITY);
        while self.target_load.is_exceeded_by(live, capacity) {
            capacity = match capacity.checked_mul(2) {
                Some(c) if c <= MAX_CAPACITY => c,
                _ => panic!("capacity overflow"),
            };
        }
        capacity
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            max_load: LoadFactor { num: 1, den: 2 },
            target_load: LoadFactor { num: 1, den: 4 },
        }
    }
}

/// Clamp a capacity hint to `MIN_CAPACITY` and round it up to a power of two.
pub(crate) fn normalize_capacity(hint: usize) -> Result<usize, MapError> {
    hint.max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .filter(|&c| c <= MAX_CAPACITY)
        .ok_or(MapError::InvalidCapacity {
            hint,
            max: MAX_CAPACITY,
        })
}

/// Rebuild `old` into fresh arrays of `capacity` buckets.
///
/// Occupied buckets are re-placed by their stored hash; tombstones and empty
/// buckets are not carried over. `old` is consumed, so the two array sets are
/// never live for mutation at once. When `follow` names an occupied bucket of
/// `old`, its index in the new arrays is returned alongside.
pub(crate) fn rehash<K, V>(
    mut old: SlotArrays<K, V>,
    capacity: usize,
    follow: Option<usize>,
) -> (SlotArrays<K, V>, Option<usize>) {
    let mut fresh = SlotArrays::new(capacity);
    let mut followed = None;
    for i in 0..old.capacity() {
        if let Some((hash, key, value)) = old.take(i) {
            let at = first_free(&fresh, hash).expect("rehash target has room for every entry");
            fresh.occupy(at, hash, key, value);
            if follow == Some(i) {
                followed = Some(at);
            }
        }
    }
    (fresh, followed)
}
