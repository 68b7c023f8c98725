// Collision behavior of OpenMap.
//
// Keys that share a probe chain must stay individually addressable through
// removals: a tombstone keeps the chain intact, a probe never stops on one,
// and a key is only ever found through an Occupied bucket holding it.
use probe_map::hash::BuildPoly31Hasher;
use probe_map::OpenMap;
use std::hash::{Hash, Hasher};

/// Two distinct strings with the same 32-bit polynomial hash.
const COLLIDING_A: &str = "q978Q1iCaznURFPWnTy1";
const COLLIDING_B: &str = "tW5V7aiYeLQ4ZrCUGJ1x";

/// A key type with a controllable hash value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CollidingKey {
    id: u32,
    forced_hash: u64,
}

impl CollidingKey {
    const fn new(id: u32, hash: u64) -> Self {
        Self {
            id,
            forced_hash: hash,
        }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forced_hash.hash(state);
    }
}

// Test: removing the first of two colliding strings.
// Assumes: both strings hash identically under the polynomial hasher, so the
// second sits behind the first on the same probe chain.
// Verifies: the second stays reachable past the tombstone, and overwriting
// it does not bring the first back.
#[test]
fn colliding_strings_survive_removal_of_the_first() {
    let mut m: OpenMap<String, i32, BuildPoly31Hasher> = OpenMap::with_hasher(BuildPoly31Hasher);
    m.insert(COLLIDING_A.to_string(), 1);
    m.insert(COLLIDING_B.to_string(), 2);
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(COLLIDING_A), Some(&1));
    assert_eq!(m.get(COLLIDING_B), Some(&2));

    assert!(m.remove(COLLIDING_A));
    assert_eq!(m.tombstones(), 1);
    assert!(!m.contains_key(COLLIDING_A));
    assert_eq!(m.get(COLLIDING_B), Some(&2));

    assert_eq!(m.insert(COLLIDING_B.to_string(), 3), Some(2));
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(COLLIDING_B), Some(&3));
    assert!(!m.contains_key(COLLIDING_A));
}

// Test: tombstone reuse inside a chain.
// Assumes: polynomial hashing of u32 is the identity, so with 8 buckets keys
// 1, 9 and 17 share home bucket 1 and key 2 lives in bucket 2 or later.
// Verifies: a removed head leaves 9 reachable, and a new colliding key takes
// the freed bucket instead of extending the chain.
#[test]
fn new_key_reuses_tombstone_at_chain_head() {
    let mut m: OpenMap<u32, &str, BuildPoly31Hasher> = OpenMap::with_hasher(BuildPoly31Hasher);
    m.insert(1, "one");
    m.insert(9, "nine");
    m.insert(2, "two");
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![1, 9, 2]);

    assert!(m.remove(&1));
    assert_eq!(m.get(&9), Some(&"nine"));
    assert_eq!(m.get(&2), Some(&"two"));

    m.insert(17, "seventeen");
    assert_eq!(m.tombstones(), 0);
    assert_eq!(m.capacity(), 8);
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![17, 9, 2]);
    assert!(!m.contains_key(&1));
}

// Test: a long chain of forced collisions.
// Verifies: every key stays retrievable as the chain grows through several
// rebuilds, and overwrites inside the chain do not duplicate keys.
#[test]
fn forced_collision_chain() {
    let keys: Vec<CollidingKey> = (0..40).map(|i| CollidingKey::new(i, 0xCAFE)).collect();

    let mut m = OpenMap::new();
    for (i, k) in keys.iter().enumerate() {
        m.insert(k.clone(), i);
    }
    assert_eq!(m.len(), 40);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(m.get(k), Some(&i));
    }

    for k in &keys {
        m.insert(k.clone(), 0);
    }
    assert_eq!(m.len(), 40);
    assert!(m.values().all(|v| *v == 0));
}

// Test: removing from the middle of a collision chain.
// Verifies: keys before and after the removed one remain reachable, and the
// removed key is absent even though its neighbours share its hash.
#[test]
fn remove_from_chain_middle() {
    let k1 = CollidingKey::new(1, 0xAAAA);
    let k2 = CollidingKey::new(2, 0xAAAA);
    let k3 = CollidingKey::new(3, 0xAAAA);

    let mut m = OpenMap::new();
    m.insert(k1.clone(), 10);
    m.insert(k2.clone(), 20);
    m.insert(k3.clone(), 30);

    assert!(m.remove(&k2));
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(&k1), Some(&10));
    assert_eq!(m.get(&k2), None);
    assert_eq!(m.get(&k3), Some(&30));

    // Re-inserting the removed key lands in its old bucket, not after k3.
    m.insert(k2.clone(), 21);
    assert_eq!(m.tombstones(), 0);
    assert_eq!(m.get(&k2), Some(&21));
}

// Test: draining a whole chain and refilling it with fresh keys.
// Verifies: no removed key is ever reported present again and the live
// count matches the reinserted set.
#[test]
fn drain_and_refill_chain() {
    let mut m = OpenMap::new();
    for i in 0..30 {
        m.insert(CollidingKey::new(i, 7), i);
    }
    for i in 0..30 {
        assert!(m.remove(&CollidingKey::new(i, 7)));
    }
    assert!(m.is_empty());
    for i in 100..130 {
        m.insert(CollidingKey::new(i, 7), i);
    }
    assert_eq!(m.len(), 30);
    for i in 0..30 {
        assert!(!m.contains_key(&CollidingKey::new(i, 7)));
    }
    for i in 100..130 {
        assert_eq!(m.get(&CollidingKey::new(i, 7)), Some(&i));
    }
}
