// Table integration tests.
//
// Each test states the behavior it checks. Core invariants exercised:
// - Round-trip: get returns the most recently put value for a key.
// - Deletion: removed keys are absent; repeated removes are no-ops.
// - Load bound: len / capacity < 0.7 after every put.
// - Capacity stays prime through creation and growth.
// - Non-ownership: reference and arena-handle keys are never freed.
use prime_hashtable::{
    is_prime, KeyHash, StdEq, StdHash, Table, MAX_LOAD_FACTOR, TARGET_LOAD_FACTOR,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::BuildHasherDefault;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slotmap::{DefaultKey, SlotMap};

fn integer_mix(k: &u64) -> u64 {
    let mut x = *k as u32 as u64;
    x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
    x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
    (x >> 16) ^ x
}

fn same_value(a: &u64, b: &u64) -> bool {
    a == b
}

fn assert_healthy<K, V, E, H>(t: &Table<K, V, E, H>)
where
    E: prime_hashtable::KeyEq<K>,
    H: KeyHash<K>,
{
    assert!(is_prime(t.capacity() as u64), "capacity {} not prime", t.capacity());
    assert!(
        t.load_factor() < MAX_LOAD_FACTOR,
        "load {} / {} too high",
        t.len(),
        t.capacity()
    );
}

fn delete_scenario<E, H>(mut t: Table<u64, u64, E, H>)
where
    E: prime_hashtable::KeyEq<u64>,
    H: KeyHash<u64>,
{
    for i in 0..10 {
        t.put(i, i);
    }
    assert_eq!(t.len(), 10);

    t.remove(&0);
    // Removing again must not disturb anything.
    t.remove(&0);
    t.remove(&1);
    t.remove(&2);

    for i in 0..10 {
        assert_eq!(t.contains_key(&i), i > 2, "key {}", i);
    }
    assert_eq!(t.len(), 7);
}

fn random_workload<E, H>(mut t: Table<u64, u64, E, H>, n: u64, seed: u64)
where
    E: prime_hashtable::KeyEq<u64>,
    H: KeyHash<u64>,
{
    let mut rng = SmallRng::seed_from_u64(seed);
    let values: Vec<u64> = (0..n).map(|_| rng.random_range(0..100)).collect();
    for (k, &v) in values.iter().enumerate() {
        t.put(k as u64, v);
        assert!(t.load_factor() < MAX_LOAD_FACTOR);
    }
    for (k, &v) in values.iter().enumerate() {
        let k = k as u64;
        assert!(t.contains_key(&k), "missing key {}", k);
        assert_eq!(t.get(&k), Some(&v), "wrong value for key {}", k);
    }
    assert_eq!(t.len(), n as usize);
    assert_healthy(&t);
}

// Test: zero capacity selects the default of 17.
#[test]
fn zero_capacity_defaults_to_seventeen() {
    let t: Table<u64, u64> = Table::with_capacity(0);
    assert_eq!(t.capacity(), 17);
    assert_eq!(t.len(), 0);
    assert!(t.is_empty());
}

// Test: deleting 0, 0, 1, 2 out of 0..9 with the default strategies.
#[test]
fn delete_with_default_strategies() {
    delete_scenario(Table::with_capacity(0));
    delete_scenario(Table::with_capacity(5));
}

// Test: same deletion scenario with custom equality and hash.
#[test]
fn delete_with_custom_strategies() {
    delete_scenario(Table::with_strategies(5, same_value, integer_mix));
}

// Test: 10,000 keys with random values, default strategies.
// Verifies: every key is found with its value; capacity prime; load bound.
#[test]
fn ten_thousand_keys_default_strategies() {
    random_workload(Table::with_capacity(5), 10_000, 0x5eed);
}

// Test: 10,000 keys with random values, custom strategies.
#[test]
fn ten_thousand_keys_custom_strategies() {
    random_workload(Table::with_strategies(5, same_value, integer_mix), 10_000, 0xfeed);
}

// Test: overwriting keeps one entry and returns the replaced value.
#[test]
fn put_overwrites_latest_value() {
    let mut t: Table<u64, &str> = Table::new();
    assert_eq!(t.put(9, "a"), None);
    assert_eq!(t.put(9, "b"), Some("a"));
    assert_eq!(t.put(9, "c"), Some("b"));
    assert_eq!(t.len(), 1);
    assert_eq!(t.get(&9), Some(&"c"));
}

// Test: remove returns the value once, then nothing.
#[test]
fn remove_is_idempotent() {
    let mut t: Table<i64, i64> = Table::new();
    t.put(-4, 16);
    assert_eq!(t.remove(&-4), Some(16));
    assert_eq!(t.remove(&-4), None);
    assert_eq!(t.remove(&12345), None);
    assert!(t.is_empty());
}

// Test: heavy insert/remove churn keeps all invariants.
// Verifies: capacity stays near twice the 40-key working set even though
// every round leaves tombstones behind.
#[test]
fn churn_keeps_invariants() {
    let mut t: Table<u64, u64> = Table::with_capacity(3);
    for round in 0..50u64 {
        for k in 0..40 {
            t.put(k, k + round);
            assert_healthy(&t);
        }
        for k in (0..40).filter(|k| k % 2 == round % 2) {
            assert_eq!(t.remove(&k), Some(k + round));
        }
        for k in 0..40 {
            let present = k % 2 != round % 2;
            assert_eq!(t.contains_key(&k), present, "round {} key {}", round, k);
        }
    }
    assert!(t.capacity() <= 80, "capacity {} after churn", t.capacity());
}

// Test: reference keys compare by address under the default strategies.
// Verifies: equal contents at different addresses are distinct keys, and
// the referents outlive the table untouched.
#[test]
fn reference_keys_use_identity() {
    let a = String::from("twin");
    let b = String::from("twin");
    let mut t: Table<&String, u32> = Table::new();
    t.put(&a, 1);
    t.put(&b, 2);
    assert_eq!(t.len(), 2);
    assert_eq!(t.get(&&a), Some(&1));
    assert_eq!(t.get(&&b), Some(&2));
    drop(t);
    assert_eq!(a, b);
}

// Test: slotmap keys index values that live in a caller-owned arena.
// Verifies: the table stores handles only; the arena still owns the data.
#[test]
fn slotmap_handles_as_keys_and_values() {
    let mut names: SlotMap<DefaultKey, String> = SlotMap::new();
    let mut parents: Table<DefaultKey, DefaultKey> = Table::new();

    let root = names.insert("root".to_string());
    let kids: Vec<DefaultKey> = (0..100).map(|i| names.insert(format!("kid{}", i))).collect();
    for &kid in &kids {
        parents.put(kid, root);
    }
    assert_eq!(parents.len(), 100);
    for &kid in &kids {
        let parent = *parents.get(&kid).expect("kid has a parent");
        assert_eq!(names[parent], "root");
    }

    // Freeing an arena entry is the caller's business; the table just
    // forgets the handle when told to.
    let gone = kids[0];
    names.remove(gone);
    assert_eq!(parents.remove(&gone), Some(root));
    assert!(!parents.contains_key(&gone));
    assert_eq!(names.len(), 100);
}

// Test: string keys with Eq/Hash strategies backed by hashbrown's hasher.
#[test]
fn string_keys_with_std_strategies() {
    let mut t: Table<String, usize, StdEq, StdHash> =
        Table::with_strategies(0, StdEq, StdHash::default());
    let words: Vec<String> = (0..500).map(|i| format!("word-{}", i)).collect();
    for (i, w) in words.iter().enumerate() {
        t.put(w.clone(), i);
    }
    for (i, w) in words.iter().enumerate() {
        assert_eq!(t.get(w), Some(&i));
    }
    assert_healthy(&t);
}

// Test: custom equality that folds case, paired with a matching hash.
#[test]
fn case_insensitive_keys() {
    let eq = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
    let hash = |k: &String| {
        k.bytes()
            .fold(5381u64, |h, b| h.wrapping_mul(33) ^ b.to_ascii_lowercase() as u64)
    };
    let mut t = Table::with_strategies(0, eq, hash);
    t.put("Content-Type".to_string(), "text/plain");
    assert_eq!(
        t.put("content-type".to_string(), "application/json"),
        Some("text/plain")
    );
    assert_eq!(t.len(), 1);
    assert_eq!(t.get(&"CONTENT-TYPE".to_string()), Some(&"application/json"));
}

// Test: requested capacities up to 10^6 round to the smallest prime at or
// above the request.
#[test]
fn requested_capacity_rounds_to_prime_up_to_a_million() {
    let requests = (1..=1_000_000usize).step_by(49_999).chain([999_983, 1_000_000]);
    for requested in requests {
        let t: Table<u64, u8> = Table::with_capacity(requested);
        let cap = t.capacity();
        assert!(is_prime(cap as u64), "capacity {} not prime", cap);
        assert!(cap >= requested);
        assert!((requested..cap).all(|n| !is_prime(n as u64)), "{} skipped a prime", requested);
    }
    let t: Table<u64, u8> = Table::with_capacity(1_000_000);
    assert_eq!(t.capacity(), 1_000_003);
}

// Test: every growth step lands at or below the target load before the
// triggering insert is placed.
#[test]
fn growth_lands_at_target_load() {
    let mut t: Table<u64, u64> = Table::with_capacity(0);
    let mut growths = 0;
    for k in 0..5_000u64 {
        let before = t.capacity();
        t.put(k, k);
        if t.capacity() != before {
            growths += 1;
            let placed_before = (t.len() - 1) as f64 / t.capacity() as f64;
            assert!(placed_before <= TARGET_LOAD_FACTOR, "k {} cap {}", k, t.capacity());
        }
    }
    assert!(growths > 0);
}

// Test: StdHash accepts any BuildHasher, not just hashbrown's default.
#[test]
fn std_hash_with_custom_build_hasher() {
    type Sip = BuildHasherDefault<DefaultHasher>;
    let hash: StdHash<Sip> = StdHash::with_hasher(Sip::default());
    // BuildHasherDefault is deterministic, so two instances agree.
    let again: StdHash<Sip> = StdHash::with_hasher(Sip::default());
    assert_eq!(hash.hash("key"), again.hash("key"));

    let mut t: Table<String, u32, StdEq, StdHash<Sip>> = Table::with_strategies(0, StdEq, hash);
    for i in 0..300 {
        t.put(format!("k{}", i), i);
    }
    assert_eq!(t.len(), 300);
    assert_eq!(t.get(&"k123".to_string()), Some(&123));
    assert_healthy(&t);
}
