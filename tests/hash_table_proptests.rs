use probe_table::{is_prime, next_prime, HashTable, ProbingPolicy, Record, MIN_ID};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn fnv1a(key: &str) -> u64 {
    key.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

fn arb_policy() -> impl Strategy<Value = ProbingPolicy> {
    proptest::sample::select(ProbingPolicy::ALL.to_vec())
}

// Property: inserted identities stay retrievable across any number of
// growth steps, capacity is always prime and each growth doubles to the
// next prime.
proptest! {
    #[test]
    fn prop_growth_keeps_records(
        cap in 0usize..64,
        policy in arb_policy(),
        keys in proptest::collection::btree_set("[a-z]{1,6}", 1..200),
    ) {
        let mut t = HashTable::new(cap, fnv1a, policy);
        prop_assert!(is_prime(t.capacity()));
        let mut inserted = Vec::new();
        for (i, k) in keys.iter().enumerate() {
            let before = t.capacity();
            let r = Record::new(k.clone(), MIN_ID + (i as u32 % 50));
            prop_assert!(t.insert(r.clone()).is_ok());
            inserted.push(r);
            let after = t.capacity();
            prop_assert!(is_prime(after));
            prop_assert!(after == before || after == next_prime(2 * before));
            prop_assert!(t.load_factor() <= 0.5);
        }
        prop_assert_eq!(t.len(), inserted.len());
        for r in &inserted {
            prop_assert_eq!(&t.lookup(r.key(), r.serial()), r);
        }
    }
}

// Property: with every key in one bucket, each policy still stores and
// distinguishes all records.
proptest! {
    #[test]
    fn prop_collision_storm(
        policy in arb_policy(),
        bucket in any::<u64>(),
        n in 1u32..40,
    ) {
        let mut t = HashTable::new(7, move |_: &str| bucket, policy);
        for i in 0..n {
            let key = format!("c{i}");
            prop_assert!(t.insert(Record::new(key, MIN_ID + i)).is_ok());
        }
        prop_assert_eq!(t.len(), n as usize);
        for i in 0..n {
            let key = format!("c{i}");
            prop_assert!(t.contains(&key, MIN_ID + i));
        }
    }
}

// Property: size always matches the number of distinct live identities
// after interleaved inserts and removes of unique keys.
proptest! {
    #[test]
    fn prop_size_matches_live(
        policy in prop_oneof![Just(ProbingPolicy::Linear), Just(ProbingPolicy::DoubleHash)],
        ops in proptest::collection::vec((any::<bool>(), 0u32..30), 1..150),
    ) {
        let mut t = HashTable::new(11, fnv1a, policy);
        let mut live: BTreeSet<u32> = BTreeSet::new();
        for (insert, n) in ops {
            let r = Record::new(format!("u{n}"), MIN_ID + n);
            if insert {
                prop_assert_eq!(t.insert(r).is_ok(), live.insert(n));
            } else {
                prop_assert_eq!(t.remove(&r), live.remove(&n));
            }
            prop_assert_eq!(t.size(), live.len());
            prop_assert_eq!(t.iter().count(), live.len());
        }
    }
}
