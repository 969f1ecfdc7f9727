#![cfg(test)]

// Property tests for ProbeSet kept inside the crate so they can inspect the
// bucket array directly.

use crate::bucket::Bucket;
use crate::probe_set::ProbeSet;
use crate::strategy::SetStrategy;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16),
    Remove(u16),
    Contains(u16),
    Clear,
}

prop_compose! {
    fn arb_ops(range: u16)(ops in proptest::collection::vec(
        prop_oneof![
            6 => (0..range).prop_map(Op::Insert),
            5 => (0..range).prop_map(Op::Remove),
            2 => (0..range).prop_map(Op::Contains),
            1 => Just(Op::Clear),
        ], 1..300)) -> Vec<Op> { ops }
}

// Collision variant: a handful of distinct hashes for many values.
#[derive(Clone, Default)]
struct FewHashes;
impl SetStrategy<u16> for FewHashes {
    fn hash(&self, v: &u16) -> u64 {
        (*v % 3) as u64
    }
    fn equals(&self, a: &u16, b: &u16) -> bool {
        a == b
    }
}

// Structural invariants that must hold whenever an operation returns:
// - counters agree with the bucket array;
// - occupied slots hold distinct values, each reachable by lookup;
// - load factor stays at or below the grow threshold, and above the shrink
//   threshold unless at minimum capacity or empty.
fn check_structure<S>(sut: &ProbeSet<u16, S>) -> Result<(), TestCaseError>
where
    S: SetStrategy<u16>,
{
    let slots = sut.slots();
    let occupied = slots
        .iter()
        .filter(|b| matches!(b, Bucket::Occupied { .. }))
        .count();
    let tombs = slots.iter().filter(|b| b.is_tombstone()).count();
    prop_assert_eq!(occupied, sut.len());
    prop_assert_eq!(tombs, sut.tombstones());

    let mut seen = HashSet::new();
    for b in slots {
        if let Bucket::Occupied { hash, value } = b {
            prop_assert!(seen.insert(*value), "duplicate value {}", value);
            prop_assert_eq!(*hash, sut.strategy().hash(value));
            prop_assert!(sut.contains(value));
        }
    }

    let cap = sut.capacity();
    if cap > 0 {
        let policy = sut.policy();
        prop_assert!(sut.load_factor() <= policy.grow_at());
        prop_assert!(sut.len() + sut.tombstones() < cap, "no vacancy left");
        if cap > policy.min_capacity() && !sut.is_empty() {
            prop_assert!(
                sut.load_factor() > policy.shrink_at(),
                "load {} at capacity {}",
                sut.load_factor(),
                cap
            );
        }
    }
    Ok(())
}

fn run<S>(mut sut: ProbeSet<u16, S>, ops: Vec<Op>) -> Result<(), TestCaseError>
where
    S: SetStrategy<u16>,
{
    let mut model: HashSet<u16> = sut.iter().copied().collect();
    check_structure(&sut)?;
    for op in ops {
        match op {
            Op::Insert(v) => {
                let added = sut.insert(v);
                prop_assert_eq!(added, model.insert(v));
                prop_assert!(sut.contains(&v));
            }
            Op::Remove(v) => {
                let removed = sut.remove(&v);
                prop_assert_eq!(removed, model.remove(&v));
                prop_assert!(!sut.contains(&v));
            }
            Op::Contains(v) => {
                prop_assert_eq!(sut.contains(&v), model.contains(&v));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(0, sut.capacity());
            }
        }
        prop_assert_eq!(sut.len(), model.len());
        check_structure(&sut)?;
    }
    let contents: HashSet<u16> = sut.iter().copied().collect();
    prop_assert_eq!(contents, model);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn prop_structure_default_strategy(ops in arb_ops(64)) {
        run(ProbeSet::new(), ops)?;
    }

    #[test]
    fn prop_structure_with_collisions(ops in arb_ops(24)) {
        run(ProbeSet::with_strategy(FewHashes), ops)?;
    }

    // Collected sets start inside the load band however many duplicates
    // the input carried, and stay there.
    #[test]
    fn prop_structure_from_collected(
        seed in proptest::collection::vec(0u16..32, 0..600),
        ops in arb_ops(64),
    ) {
        run(seed.into_iter().collect::<ProbeSet<u16>>(), ops)?;
    }

    // A table reserved far beyond its contents is back in the band after
    // the first erase.
    #[test]
    fn prop_reserved_table_settles_on_erase(
        reserve in 0usize..5000,
        values in proptest::collection::vec(0u16..256, 2..100),
    ) {
        let mut sut: ProbeSet<u16> = ProbeSet::with_capacity(reserve);
        sut.extend(values.iter().copied());
        sut.remove(&values[0]);
        check_structure(&sut)?;
    }

    // Resize round-trip: membership is identical before and after every
    // grow, shrink or purge.
    #[test]
    fn prop_resize_preserves_membership(values in proptest::collection::vec(0u16..512, 1..200)) {
        let mut sut: ProbeSet<u16> = ProbeSet::new();
        for v in &values {
            let before: HashSet<u16> = sut.iter().copied().collect();
            let cap = sut.capacity();
            sut.insert(*v);
            if sut.capacity() != cap {
                for b in &before {
                    prop_assert!(sut.contains(b));
                }
            }
        }
        for v in &values {
            let cap = sut.capacity();
            let before: HashSet<u16> = sut.iter().copied().collect();
            sut.remove(v);
            if sut.capacity() != cap {
                for b in before.iter().filter(|b| *b != v) {
                    prop_assert!(sut.contains(b));
                }
            }
        }
        prop_assert!(sut.is_empty());
    }
}
