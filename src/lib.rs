//! probe-map: a single-threaded, open-addressing hash map with linear
//! probing, tombstoned deletion and rehash-on-growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: compact storage and fast lookup, built in small layers so each
//!   piece can be reasoned about and tested on its own.
//! - Layers:
//!   - SlotArrays<K, V>: parallel `status`/`hash`/`key`/`value` arrays, one
//!     index per physical bucket; buckets are Empty, Occupied or Tombstone.
//!   - probe: the linear probe sequence. Empty ends a search, tombstones are
//!     passed through and the first one is remembered as the insertion point.
//!   - growth: the load policy and a pure `rehash(old, capacity) -> new`.
//!   - RawTable<K, V>: owns the arrays plus the live (`len`) and
//!     live-or-tombstoned (`used`) counters; applies the growth policy.
//!   - OpenMap<K, V, S>: public API; hashes keys, guards entry points and
//!     implements the standard collection traits.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync`, no atomics, no locks.
//! - Capacity is a power of two, at least `MIN_CAPACITY`, and only grows.
//! - After every mutation `used / capacity` stays at or below the growth
//!   trigger (1/2 by default); an insertion that crosses it rebuilds the table
//!   at the smallest size that brings live entries to the target (1/4).
//! - No per-entry heap allocation beyond the map's own arrays.
//!
//! Hasher and rehashing invariants
//! - Each occupied bucket stores the `u64` hash computed at insertion, and a
//!   rebuild re-buckets by that stored hash. `K: Hash` is never invoked after
//!   insertion and a rebuild never calls into user code.
//! - Probes compare stored hashes before calling `K: Eq`.
//!
//! Reentrancy policy
//! - Probes and mutations run inside a debug-only critical section; user
//!   `Eq`/`Hash` code that reaches back into the map panics in debug builds.
//! - Iterators and `for_each`/`map_entries` hold a traversal section. Reads
//!   may nest inside it; mutation during traversal is rejected statically by
//!   the borrow checker and, for code that goes around it, by the guard.
//! - `clear` drops the old entries after leaving its critical section so
//!   destructors may read the map.
//!
//! Notes and non-goals
//! - No iteration-order guarantee; order is physical and changes on growth.
//! - No shrink-on-removal, no persistent variant, no concurrent access.

mod error;
mod growth;
pub mod hash;
mod iter;
mod open_map;
mod open_map_proptest;
mod probe;
mod reentrancy;
mod slots;
mod table;

// Public surface
pub use error::MapError;
pub use growth::{GrowthPolicy, LoadFactor, MAX_CAPACITY, MIN_CAPACITY};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use open_map::OpenMap;
