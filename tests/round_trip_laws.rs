//! Integration coverage for the round-trip laws and idempotence properties of
//! `spec.md` §8.

use dynarray::{RArray, Value};

fn ints(xs: &[i64]) -> Vec<Value> {
    xs.iter().map(|&x| Value::Int(x)).collect()
}

#[test]
fn push_then_pop_returns_the_pushed_value_and_restores_state() {
    let a = RArray::from_vec(ints(&[1, 2, 3]));
    let before = a.to_vec();
    a.push(Value::Int(42)).unwrap();
    let popped = a.pop().unwrap();
    assert_eq!(popped, Value::Int(42));
    assert_eq!(a.to_vec(), before);
}

#[test]
fn rotate_then_inverse_rotate_is_identity() {
    let a = RArray::from_vec(ints(&[1, 2, 3, 4, 5, 6, 7]));
    let before = a.to_vec();
    for k in [-7, -3, -1, 0, 1, 3, 5, 7, 12, -12] {
        a.rotate(k).unwrap();
        a.rotate(-k).unwrap();
        assert_eq!(a.to_vec(), before, "failed to round-trip rotate({k})");
    }
}

#[test]
fn reverse_twice_is_identity() {
    let a = RArray::from_vec(ints(&[1, 2, 3, 4]));
    let before = a.to_vec();
    a.reverse().unwrap();
    a.reverse().unwrap();
    assert_eq!(a.to_vec(), before);
}

#[test]
fn dup_is_element_wise_equal_but_a_distinct_object() {
    let a = RArray::from_vec(ints(&[1, 2, 3]));
    let b = a.dup();
    assert_eq!(a, b);
    assert!(!std::ptr::eq(&a, &b));
    // Mutating one must not be observable through the other.
    b.push(Value::Int(4)).unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 4);
}

#[test]
fn to_vec_round_trip_preserves_order() {
    let a = RArray::from_vec(ints(&[5, 4, 3, 2, 1]));
    let rebuilt = RArray::from_vec(a.to_vec());
    assert_eq!(a, rebuilt);
}

#[test]
fn uniq_is_idempotent() {
    let a = RArray::from_vec(ints(&[1, 1, 2, 3, 3, 3, 4]));
    a.uniq().unwrap();
    let once = a.to_vec();
    let changed_again = a.uniq().unwrap();
    assert!(!changed_again);
    assert_eq!(a.to_vec(), once);
}

#[test]
fn compact_is_idempotent() {
    let a = RArray::from_vec(vec![
        Value::Int(1),
        Value::Nil,
        Value::Int(2),
        Value::Nil,
        Value::Int(3),
    ]);
    a.compact().unwrap();
    let once = a.to_vec();
    let changed_again = a.compact().unwrap();
    assert!(!changed_again);
    assert_eq!(a.to_vec(), once);
}

#[test]
fn freeze_is_idempotent_and_one_way() {
    let a = RArray::from_vec(ints(&[1, 2, 3]));
    a.freeze();
    assert!(a.is_frozen());
    a.freeze();
    assert!(a.is_frozen());
}

#[test]
fn sort_is_idempotent_under_a_total_order() {
    let a = RArray::from_vec(ints(&[3, 1, 4, 1, 5, 9, 2, 6]));
    a.sort().unwrap();
    let once = a.to_vec();
    a.sort().unwrap();
    assert_eq!(a.to_vec(), once);
}
