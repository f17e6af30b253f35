//! Integration coverage for the concrete end-to-end scenarios of `spec.md` §8.

use std::rc::Rc;

use dynarray::enums::value::ArrayHandle;
use dynarray::{ArrayError, RArray, Value};

fn ints(xs: &[i64]) -> Vec<Value> {
    xs.iter().map(|&x| Value::Int(x)).collect()
}

fn as_ints(a: &RArray) -> Vec<i64> {
    a.to_vec()
        .into_iter()
        .map(|v| match v {
            Value::Int(i) => i,
            other => panic!("expected int, got {other:?}"),
        })
        .collect()
}

/// Scenario 1: queue pattern. 10,000 rounds of push/shift never let the backing
/// buffer grow unboundedly, and the array is empty at the end.
#[test]
fn queue_pattern_amortizes_to_constant_capacity() {
    let a = RArray::new();
    let mut max_capacity_seen = 0usize;
    for i in 0..10_000i64 {
        a.push(Value::Int(i)).unwrap();
        max_capacity_seen = max_capacity_seen.max(a.capacity());
        a.shift().unwrap();
    }
    assert!(a.is_empty());
    assert!(max_capacity_seen < 200, "capacity blew up to {max_capacity_seen}");
}

/// Scenario 2: slice-and-modify. A write to the source detaches the view it handed
/// out; the view keeps its own, now-independent snapshot.
///
/// The slice window must exceed `EMBED_CAP` (4) for `create_view` to actually hand
/// back a `Shared` view rather than an embedded copy (spec §4.C.3: small slices are
/// copied inline, not shared) — otherwise `shares_storage_with` is vacuously `false`
/// from the start and never exercises the cancel-sharing path at all.
#[test]
fn slice_and_modify_detaches_the_view() {
    let a = RArray::from_vec(ints(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]));
    let b = a.slice(1, 5).unwrap().unwrap();
    assert_eq!(as_ints(&b), vec![2, 3, 4, 5, 6]);
    assert!(a.shares_storage_with(&b));

    a.store(0, Value::Int(99)).unwrap();
    assert_eq!(as_ints(&a), vec![99, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(as_ints(&b), vec![2, 3, 4, 5, 6]);
    assert!(!a.shares_storage_with(&b));
}

/// Scenario 3: flatten with a cycle. `a.push(a)` then `flatten(None)` (unbounded
/// depth) raises a cycle error and leaves `a` untouched.
#[test]
fn flatten_with_cycle_raises_and_preserves_receiver() {
    let a = Rc::new(RArray::from_vec(ints(&[1, 2])));
    let self_ref = Value::Array(ArrayHandle(a.clone()));
    a.push(self_ref).unwrap();

    let err = a.flatten(None);
    assert_eq!(err, Err(ArrayError::Cycle));
    assert_eq!(a.len(), 3);
    assert_eq!(a.at(0), Value::Int(1));
    assert_eq!(a.at(1), Value::Int(2));
    match a.at(2) {
        Value::Array(handle) => assert!(handle.ptr_eq(&ArrayHandle(a.clone()))),
        other => panic!("expected the self-reference to survive, got {other:?}"),
    }
}

/// Scenario 4: sort with a reentrant comparator that freezes the receiver mid-sort.
/// The sort fails with a frozen-write error; the elements (as a multiset) survive.
#[test]
fn sort_with_reentrant_freeze_fails_and_preserves_multiset() {
    let a = RArray::from_vec(ints(&[3, 1, 2]));
    let frozen_inside = std::cell::Cell::new(false);
    let result = a.sort_by(|x, y| {
        if !frozen_inside.get() {
            a.freeze();
            frozen_inside.set(true);
        }
        use dynarray::ElementOrd;
        Ok(x.element_cmp(y).unwrap())
    });
    assert_eq!(result, Err(ArrayError::FrozenWrite));

    let mut remaining = as_ints(&a);
    remaining.sort();
    assert_eq!(remaining, vec![1, 2, 3]);
    assert!(a.is_frozen());
}

/// Scenario 5: union preserves first-occurrence order from the left operand.
#[test]
fn union_preserves_first_occurrence_order() {
    let a = RArray::from_vec(ints(&[3, 1, 4, 1, 5]));
    let b = RArray::from_vec(ints(&[9, 2, 6, 5, 3]));
    let u = dynarray::algo::setops::union(&[&a, &b]);
    assert_eq!(as_ints(&u), vec![3, 1, 4, 5, 9, 2, 6]);
}

/// Scenario 6: a cartesian product whose result would exceed `MAX_LEN` fails before
/// any allocation of the result, for both a million-element operands.
#[test]
fn product_of_huge_arrays_is_rejected_before_allocating() {
    let a = RArray::new();
    a.resize(1_000_000).unwrap();
    let b = RArray::new();
    b.resize(1_000_000).unwrap();
    let err = dynarray::algo::permute::product(&[&a, &b]);
    assert!(matches!(err, Err(ArrayError::SizeLimitExceeded { .. })));
}

/// Scenario 7: sampling without replacement yields distinct elements all drawn from
/// the source, and (loosely) is not obviously biased toward one subset.
#[test]
fn sample_without_replacement_is_distinct_and_covers_the_source() {
    use dynarray::{DefaultRng, RngChoice};

    let a = RArray::from_vec((0..10i64).map(Value::Int).collect());
    let mut seen_subsets = std::collections::HashSet::new();
    for seed in 0..50u64 {
        let mut rng = DefaultRng::new(RngChoice::Seeded(seed));
        let s = dynarray::algo::sample::sample(&a, 5, &mut rng).unwrap();
        let mut values = as_ints(&s);
        assert_eq!(values.len(), 5);
        values.sort();
        assert!(values.windows(2).all(|w| w[0] != w[1]), "duplicate in {values:?}");
        assert!(values.iter().all(|v| (0..10).contains(v)));
        seen_subsets.insert(values);
    }
    assert!(
        seen_subsets.len() > 5,
        "sampling looks degenerate: only {} distinct subsets across 50 trials",
        seen_subsets.len()
    );
}
