//! Linear probing over `SlotArrays`.
//!
//! A probe starts at `hash & mask` and walks forward one bucket at a time,
//! wrapping at the end, for at most `capacity` steps. Empty ends the walk;
//! tombstones are passed through and the first one is remembered as the
//! insertion point.

use crate::slots::{SlotArrays, Status};

/// Bucket indices visited for one hash, in probe order.
pub(crate) struct ProbeSeq {
    pos: usize,
    mask: usize,
    remaining: usize,
}

impl ProbeSeq {
    #[inline]
    pub(crate) fn new(hash: u64, mask: usize) -> Self {
        Self {
            pos: (hash as usize) & mask,
            mask,
            remaining: mask + 1,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let i = self.pos;
        self.pos = (self.pos + 1) & self.mask;
        Some(i)
    }
}

/// Outcome of probing for a key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    /// The key lives in this bucket.
    Found(usize),
    /// The key is absent; `index` is where it would be inserted. `fresh` is
    /// true when that bucket is Empty rather than a reused tombstone.
    Vacant { index: usize, fresh: bool },
    /// Every bucket was visited without meeting Empty or a tombstone.
    Exhausted,
}

/// Probe `slots` for an entry with `hash` accepted by `is_match`.
///
/// Stored hashes are compared first so `is_match` (user `Eq`) only runs on
/// plausible candidates.
pub(crate) fn probe<K, V>(
    slots: &SlotArrays<K, V>,
    hash: u64,
    mut is_match: impl FnMut(&K) -> bool,
) -> Probe {
    let mut first_tombstone = None;
    for i in ProbeSeq::new(hash, slots.mask()) {
        match slots.status(i) {
            Status::Empty => {
                return match first_tombstone {
                    Some(t) => Probe::Vacant {
                        index: t,
                        fresh: false,
                    },
                    None => Probe::Vacant {
                        index: i,
                        fresh: true,
                    },
                };
            }
            Status::Tombstone => {
                if first_tombstone.is_none() {
                    first_tombstone = Some(i);
                }
            }
            Status::Occupied => {
                if slots.hash(i) == hash && slots.key(i).map_or(false, &mut is_match) {
                    return Probe::Found(i);
                }
            }
        }
    }
    match first_tombstone {
        Some(t) => Probe::Vacant {
            index: t,
            fresh: false,
        },
        None => Probe::Exhausted,
    }
}

/// Find the first non-occupied bucket for `hash`. Used when rebuilding into
/// fresh arrays, where keys are known to be distinct and no equality is needed.
pub(crate) fn first_free<K, V>(slots: &SlotArrays<K, V>, hash: u64) -> Option<usize> {
    ProbeSeq::new(hash, slots.mask()).find(|&i| slots.status(i) != Status::Occupied)
}
