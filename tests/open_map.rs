// OpenMap integration test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round trip: get returns the last value written for a key.
// - Removal: a removed key is absent; unrelated keys are untouched.
// - Size: len equals the number of keys for which contains_key holds.
// - Growth: rebuilding keeps every live entry and never shrinks capacity.
// - Equality: structural, independent of layout and history.
use probe_map::{GrowthPolicy, LoadFactor, MapError, OpenMap, MIN_CAPACITY};
use std::collections::BTreeSet;
use test_log::test;

// Test: the reference scenario of 100 float-valued keys.
// Assumes: keys 0..99 inserted, removed, then re-inserted with new values.
// Verifies: lengths and sampled values at each phase.
#[test]
fn hundred_keys_insert_remove_reinsert() {
    let mut m: OpenMap<i32, f64> = OpenMap::new();
    for i in 0..100 {
        m.insert(i, f64::from(i) * 7.0);
    }
    assert_eq!(m.len(), 100);
    assert_eq!(m.get(&9), Some(&63.0));
    assert_eq!(m.get(&11), Some(&77.0));

    for i in 0..100 {
        assert!(m.remove(&i), "key {i} should be present");
    }
    assert_eq!(m.len(), 0);
    assert!(m.is_empty());
    for i in 0..100 {
        assert!(!m.contains_key(&i));
        assert_eq!(m.get(&i), None);
    }

    for i in 0..100 {
        m.insert(i, f64::from(i) * 9.0);
    }
    assert_eq!(m.len(), 100);
    assert_eq!(m.get(&9), Some(&81.0));
    assert_eq!(m.get(&11), Some(&99.0));
}

// Test: last write wins.
// Assumes: repeated inserts for the same key with no removal in between.
// Verifies: get observes the final value; len counts the key once.
#[test]
fn round_trip_returns_last_write() {
    let mut m: OpenMap<String, u32> = OpenMap::new();
    for round in 0..5u32 {
        for k in 0..40u32 {
            m.insert(format!("k{k}"), k * 100 + round);
        }
    }
    assert_eq!(m.len(), 40);
    for k in 0..40u32 {
        assert_eq!(m.get(format!("k{k}").as_str()), Some(&(k * 100 + 4)));
    }
}

// Test: removal only affects its own key.
// Verifies: contains_key is false for removed keys and true for the rest.
#[test]
fn removal_is_isolated() {
    let mut m: OpenMap<u64, u64> = (0..200).map(|i| (i, i)).collect();
    for i in (0..200).step_by(3) {
        assert!(m.remove(&i));
    }
    for i in 0..200 {
        assert_eq!(m.contains_key(&i), i % 3 != 0, "key {i}");
    }
    assert!(!m.remove(&0), "second removal reports absence");
}

// Test: len tracks contains_key across an interleaving of inserts/removes.
#[test]
fn len_matches_contains_over_churn() {
    let mut m: OpenMap<u32, ()> = OpenMap::new();
    let mut x = 0x2545_f491u32;
    for _ in 0..5_000 {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        let k = x % 300;
        if x & 0x100 == 0 {
            m.insert(k, ());
        } else {
            m.remove(&k);
        }
    }
    let present = (0..300).filter(|k| m.contains_key(k)).count();
    assert_eq!(m.len(), present);
    assert_eq!(m.iter().count(), present);
}

// Test: growth keeps content.
// Assumes: enough inserts to force several rebuilds.
// Verifies: capacity is a power of two that only grows, load stays at or
// below one half, and every entry is retrievable with its value.
#[test]
fn growth_preserves_content() {
    let mut m: OpenMap<u32, u32> = OpenMap::new();
    assert_eq!(m.capacity(), MIN_CAPACITY);
    let mut capacities = vec![m.capacity()];
    for i in 0..10_000 {
        m.insert(i, i.wrapping_mul(2_654_435_761));
        let cap = m.capacity();
        if cap != *capacities.last().unwrap() {
            capacities.push(cap);
        }
        assert!((m.len() + m.tombstones()) * 2 <= cap);
    }
    assert!(capacities.len() > 3, "expected several growth cycles");
    assert!(capacities.windows(2).all(|w| w[0] < w[1]));
    assert!(capacities.iter().all(|c| c.is_power_of_two()));
    assert_eq!(m.len(), 10_000);
    for i in 0..10_000 {
        assert_eq!(m.get(&i), Some(&i.wrapping_mul(2_654_435_761)));
    }
}

// Test: tombstones are reclaimed only by a rebuild.
// Verifies: removals accumulate tombstones; continued churn eventually
// rebuilds the table, dropping them without changing capacity.
#[test]
fn churn_reclaims_tombstones_without_growing() {
    let mut m: OpenMap<u32, u32> = OpenMap::with_capacity(64);
    for i in 0..16 {
        m.insert(i, i);
    }
    for i in 0..16 {
        m.remove(&i);
    }
    assert_eq!(m.tombstones(), 16);
    assert_eq!(m.capacity(), 64);

    let mut next = 1_000;
    let mut rebuilt = false;
    for _ in 0..256 {
        m.insert(next, next);
        m.remove(&next);
        next += 1;
        if m.tombstones() < 16 {
            rebuilt = true;
            break;
        }
    }
    assert!(rebuilt, "tombstone pressure should force a rebuild");
    assert_eq!(m.capacity(), 64);
    assert!(m.is_empty());
}

// Test: get_or_insert is idempotent.
// Verifies: the first default sticks; len changes only on the first call.
#[test]
fn get_or_insert_keeps_first_default() {
    let mut m: OpenMap<&str, i32> = OpenMap::new();
    assert_eq!(*m.get_or_insert("k", 1), 1);
    assert_eq!(m.len(), 1);
    assert_eq!(*m.get_or_insert("k", 2), 1);
    assert_eq!(m.len(), 1);
    *m.get_or_insert("k", 3) += 10;
    assert_eq!(m["k"], 11);
}

// Test: non-inserting fallbacks and the required-value accessor.
#[test]
fn fallbacks_and_not_found() {
    let mut m: OpenMap<&str, i32> = OpenMap::new();
    m.insert("present", 5);
    let fallback = -1;
    assert_eq!(*m.get_or("present", &fallback), 5);
    assert_eq!(*m.get_or("absent", &fallback), -1);
    assert_eq!(m.len(), 1, "get_or never inserts");
    assert_eq!(m.lookup("present"), Ok(&5));
    assert_eq!(m.lookup("absent"), Err(MapError::NotFound));
}

// Test: equality is structural.
// Assumes: two maps reach the same contents through different histories
// and capacities.
// Verifies: equal; a differing value or an extra key makes them unequal.
#[test]
fn equality_ignores_history() {
    let mut a: OpenMap<u32, &str> = OpenMap::new();
    for (k, v) in [(1, "one"), (2, "two"), (3, "three")] {
        a.insert(k, v);
    }
    let mut b: OpenMap<u32, &str> = OpenMap::with_capacity(512);
    for k in 100..150 {
        b.insert(k, "noise");
    }
    for (k, v) in [(3, "three"), (2, "TWO"), (1, "one"), (2, "two")] {
        b.insert(k, v);
    }
    for k in 100..150 {
        b.remove(&k);
    }
    assert_ne!(a.capacity(), b.capacity());
    assert_eq!(a, b);

    b.insert(2, "deux");
    assert_ne!(a, b);
    b.insert(2, "two");
    b.insert(4, "four");
    assert_ne!(a, b);
    assert_ne!(b, a);
}

// Test: traversal visits live entries only, and map_entries leaves the
// source untouched.
#[test]
fn traversal_skips_tombstones() {
    let mut m: OpenMap<u32, u32> = (0..20).map(|i| (i, i * i)).collect();
    for i in 0..10 {
        m.remove(&i);
    }
    let mut seen = BTreeSet::new();
    m.for_each(|k, v| {
        assert_eq!(*v, k * k);
        seen.insert(*k);
    });
    assert_eq!(seen, (10..20).collect::<BTreeSet<_>>());

    let doubled = m.map_entries(|_, v| v * 2);
    assert_eq!(doubled.len(), 10);
    assert_eq!(doubled.iter().sum::<u32>(), (10..20).map(|i| i * i * 2).sum());
    assert_eq!(m.len(), 10);
    assert_eq!(m[&15], 225);
}

// Test: a custom growth policy changes when rebuilds happen.
#[test]
fn custom_policy_via_constructor() {
    let policy = GrowthPolicy::new(
        LoadFactor::new(3, 4).expect("valid trigger"),
        LoadFactor::new(1, 2).expect("valid target"),
    )
    .expect("target below trigger");
    let mut m: OpenMap<u32, u32> =
        OpenMap::with_policy(8, policy, Default::default()).expect("valid capacity");
    for i in 0..6 {
        m.insert(i, i);
    }
    assert_eq!(m.capacity(), 8, "6/8 does not exceed 3/4");
    m.insert(6, 6);
    assert_eq!(m.capacity(), 16, "7 live at or below 1/2 needs 16 buckets");
    assert_eq!(m.policy(), policy);
    assert!((0..7).all(|i| m.get(&i) == Some(&i)));
}

// Test: checked constructors reject unsupported sizes.
#[test]
fn invalid_capacity_hint_is_reported() {
    match OpenMap::<u8, u8>::try_with_capacity(usize::MAX) {
        Err(MapError::InvalidCapacity { hint, .. }) => assert_eq!(hint, usize::MAX),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected an oversized hint to be rejected"),
    }
    assert_eq!(
        OpenMap::<u8, u8>::try_with_capacity(33).map(|m| m.capacity()),
        Ok(64)
    );
}
