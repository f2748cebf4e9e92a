#![cfg(test)]

// Property tests for Table kept inside the crate so they can inspect slot
// state (tombstones, duplicate keys) that the public API does not expose.

use crate::prime::is_prime;
use crate::strategy::{KeyEq, KeyHash};
use crate::table::{Table, MAX_LOAD_FACTOR};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink toward earlier keys and op lists
// shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(u64),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<u64>, Vec<OpI>)> {
    proptest::collection::vec(any::<u64>(), 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Get),
            1 => any::<u64>().prop_map(OpI::Contains),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_structure<E, H>(t: &Table<u64, i32, E, H>, model: &HashMap<u64, i32>) -> Result<(), TestCaseError>
where
    E: KeyEq<u64>,
    H: KeyHash<u64>,
{
    prop_assert_eq!(t.len(), model.len());
    prop_assert_eq!(t.is_empty(), model.is_empty());
    prop_assert!(is_prime(t.capacity() as u64), "capacity {} not prime", t.capacity());
    prop_assert!(t.load_factor() < MAX_LOAD_FACTOR);
    prop_assert!(t.len() + t.tombstones() <= t.capacity());

    let stored: Vec<u64> = t.occupied_keys().copied().collect();
    let distinct: BTreeSet<u64> = stored.iter().copied().collect();
    prop_assert_eq!(stored.len(), distinct.len(), "duplicate key in slots");
    let expected: BTreeSet<u64> = model.keys().copied().collect();
    prop_assert_eq!(distinct, expected);
    Ok(())
}

fn run_against_model<E, H>(
    mut sut: Table<u64, i32, E, H>,
    pool: &[u64],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    E: KeyEq<u64>,
    H: KeyHash<u64>,
{
    let mut model: HashMap<u64, i32> = HashMap::new();
    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = pool[i];
                prop_assert_eq!(sut.put(k, v), model.insert(k, v));
            }
            OpI::Remove(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert!(!sut.contains_key(&k));
                // A second remove is a no-op.
                prop_assert_eq!(sut.remove(&k), None);
            }
            OpI::Get(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.find(&k).map(|b| *b.value()), model.get(&k).copied());
            }
            OpI::Contains(k) => {
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
        }
        check_structure(&sut, &model)?;
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - put returns the previous value exactly when the model has one.
// - remove returns the model's value, clears the key, and repeats as a no-op.
// - get/find/contains_key parity with the model.
// - Structure after each op: prime capacity, load < 0.7, no duplicate keys,
//   stored key set equals the model's key set.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_default_strategies((pool, ops) in arb_scenario()) {
        run_against_model(Table::with_capacity(0), &pool, ops)?;
    }

    #[test]
    fn prop_small_start((pool, ops) in arb_scenario()) {
        run_against_model(Table::with_capacity(2), &pool, ops)?;
    }

    // Three hash values for the whole pool: long probe chains threaded
    // through tombstones, and frequent early growth on exhaustion.
    #[test]
    fn prop_colliding_hash((pool, ops) in arb_scenario()) {
        run_against_model(Table::with_hash(5, |k: &u64| k % 3), &pool, ops)?;
    }

    #[test]
    fn prop_constant_hash((pool, ops) in arb_scenario()) {
        run_against_model(Table::with_hash(0, |_: &u64| 7u64), &pool, ops)?;
    }
}
