#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can inspect the
// slot array directly.

use crate::hash_table::HashTable;
use crate::primes::{is_prime, next_prime};
use crate::probe::ProbingPolicy;
use crate::record::{Record, MAX_ID, MIN_ID};
use crate::TableError;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Pool-indexed operations so shrinking moves toward earlier keys/serials.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, u32),
    Remove(usize, u32),
    Lookup(usize, u32),
    ChangePolicy(ProbingPolicy),
    Rehash,
}

fn arb_policy() -> impl Strategy<Value = ProbingPolicy> {
    proptest::sample::select(ProbingPolicy::ALL.to_vec())
}

// Serials mostly valid, occasionally just outside the accepted range.
fn arb_serial() -> impl Strategy<Value = u32> {
    prop_oneof![
        8 => MIN_ID..MIN_ID + 6,
        1 => Just(MIN_ID - 1),
        1 => Just(MAX_ID + 1),
    ]
}

fn arb_scenario() -> impl Strategy<Value = (usize, ProbingPolicy, Vec<String>, Vec<Op>)> {
    (
        0usize..40,
        arb_policy(),
        proptest::collection::vec("[a-z]{1,4}", 1..=8),
    )
        .prop_flat_map(|(cap, policy, pool)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                6 => (idx.clone(), arb_serial()).prop_map(|(i, s)| Op::Insert(i, s)),
                3 => (idx.clone(), arb_serial()).prop_map(|(i, s)| Op::Remove(i, s)),
                2 => (idx.clone(), arb_serial()).prop_map(|(i, s)| Op::Lookup(i, s)),
                1 => arb_policy().prop_map(Op::ChangePolicy),
                1 => Just(Op::Rehash),
            ];
            proptest::collection::vec(op, 1..120)
                .prop_map(move |ops| (cap, policy, pool.clone(), ops))
        })
}

fn djb2(key: &str) -> u64 {
    key.bytes()
        .fold(5381u64, |h, b| h.wrapping_mul(33).wrapping_add(u64::from(b)))
}

// Property: state-machine equivalence against a set of live identities.
// Invariants exercised across random operation sequences:
// - insert rejects out-of-range serials first, then live duplicates; on
//   success the identity becomes retrievable and the load factor is <= 0.5.
// - remove tombstones exactly one live record with the same key, or none.
// - lookup returns an equal live record iff the identity is live.
// - len equals the number of live slots, counters never exceed capacity,
//   and capacity stays prime across growth.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, policy, pool, ops) in arb_scenario()) {
        let mut sut = HashTable::new(cap, djb2, policy);
        let mut model: BTreeSet<(String, u32)> = BTreeSet::new();
        prop_assert!(is_prime(sut.capacity()));

        for op in ops {
            match op {
                Op::Insert(i, s) => {
                    let key = pool[i].clone();
                    let before = sut.capacity();
                    let res = sut.insert(Record::new(key.clone(), s));
                    if !(MIN_ID..=MAX_ID).contains(&s) {
                        prop_assert!(matches!(res, Err(TableError::SerialOutOfRange { .. })), "{:?}", res);
                    } else if model.contains(&(key.clone(), s)) {
                        prop_assert!(matches!(res, Err(TableError::Duplicate { .. })), "{:?}", res);
                    } else {
                        prop_assert!(res.is_ok(), "{:?}", res);
                        model.insert((key, s));
                        prop_assert!(sut.load_factor() <= 0.5);
                        let after = sut.capacity();
                        prop_assert!(after == before || after == next_prime(2 * before));
                    }
                }
                Op::Remove(i, s) => {
                    let key = &pool[i];
                    let with_key: Vec<u32> = model
                        .iter()
                        .filter(|(k, _)| k == key)
                        .map(|(_, s)| *s)
                        .collect();
                    let removed = sut.remove(&Record::new(key.clone(), s));
                    if removed {
                        let gone: Vec<u32> = with_key
                            .iter()
                            .copied()
                            .filter(|&s| !sut.contains(key, s))
                            .collect();
                        prop_assert_eq!(gone.len(), 1);
                        model.remove(&(key.clone(), gone[0]));
                    } else {
                        // Quadratic probing reaches only half the slots, so
                        // records placed by a rehash may be out of its reach.
                        if sut.policy() != ProbingPolicy::Quadratic {
                            prop_assert!(with_key.is_empty());
                        }
                    }
                }
                Op::Lookup(i, s) => {
                    let key = &pool[i];
                    let found = sut.lookup(key, s);
                    if model.contains(&(key.clone(), s)) {
                        prop_assert!(found.is_live());
                        prop_assert_eq!(found, Record::new(key.clone(), s));
                    } else {
                        prop_assert!(found.is_not_found());
                    }
                }
                Op::ChangePolicy(p) => {
                    let active = sut.policy();
                    sut.change_probing_policy(p);
                    prop_assert_eq!(sut.policy(), active);
                    prop_assert_eq!(sut.pending_policy(), Some(p));
                }
                Op::Rehash => {
                    let before = sut.capacity();
                    let pending = sut.pending_policy();
                    sut.rehash();
                    prop_assert_eq!(sut.capacity(), next_prime(2 * before));
                    prop_assert_eq!(sut.tombstones(), 0);
                    if let Some(p) = pending {
                        prop_assert_eq!(sut.policy(), p);
                    }
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.iter().count(), model.len());
            prop_assert!(sut.len() + sut.tombstones() <= sut.capacity());
            prop_assert!(is_prime(sut.capacity()));
        }

        for (k, s) in &model {
            prop_assert!(sut.contains(k, *s));
        }
    }
}
