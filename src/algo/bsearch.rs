//! # **Binary Search Module** - *`bsearch` in both find-minimum and find-any modes*
//!
//! Spec §4.E: "Two block modes: find-minimum (block returns true/false, looking for
//! the smallest index where it becomes true) and find-any (block returns a numeric
//! comparison to zero; zero means 'this one')." The two modes are distinct closures in
//! this crate (no dynamic dispatch on the block's return type, since Rust's type
//! system already distinguishes them at the call site) rather than a single function
//! branching on a runtime-typed return value.

use crate::enums::value::Value;
use crate::structs::array::RArray;

/// Find-minimum mode: returns the smallest index at which `pred` first becomes `true`,
/// assuming `pred` is monotonic (`false*` then `true*`) over the array.
pub fn find_minimum_index<F>(arr: &RArray, mut pred: F) -> Option<usize>
where
    F: FnMut(&Value) -> bool,
{
    let len = arr.len();
    let mut lo = 0usize;
    let mut hi = len;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(&arr.at(mid as i64)) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    if lo < len {
        Some(lo)
    } else {
        None
    }
}

pub fn find_minimum<F>(arr: &RArray, pred: F) -> Value
where
    F: FnMut(&Value) -> bool,
{
    find_minimum_index(arr, pred)
        .map(|i| arr.at(i as i64))
        .unwrap_or(Value::Nil)
}

/// Find-any mode: `cmp` returns negative/zero/positive relative to the sought value;
/// the array must be sorted so that `cmp` is monotonically nondecreasing.
pub fn find_any_index<F>(arr: &RArray, mut cmp: F) -> Option<usize>
where
    F: FnMut(&Value) -> i64,
{
    let len = arr.len();
    let mut lo = 0usize;
    let mut hi = len;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let c = cmp(&arr.at(mid as i64));
        match c.cmp(&0) {
            std::cmp::Ordering::Equal => return Some(mid),
            std::cmp::Ordering::Less => hi = mid,
            std::cmp::Ordering::Greater => lo = mid + 1,
        }
    }
    None
}

pub fn find_any<F>(arr: &RArray, cmp: F) -> Value
where
    F: FnMut(&Value) -> i64,
{
    find_any_index(arr, cmp)
        .map(|i| arr.at(i as i64))
        .unwrap_or(Value::Nil)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_minimum_locates_threshold() {
        let a = RArray::from_vec((0..10).map(Value::Int).collect());
        let idx = find_minimum_index(&a, |v| matches!(v, Value::Int(i) if *i >= 5));
        assert_eq!(idx, Some(5));
    }

    #[test]
    fn find_any_locates_exact_value() {
        let a = RArray::from_vec((0..10).map(Value::Int).collect());
        let idx = find_any_index(&a, |v| match v {
            Value::Int(i) => i - 7,
            _ => unreachable!(),
        });
        assert_eq!(idx, Some(7));
    }

    #[test]
    fn find_any_failure_is_none() {
        let a = RArray::from_vec((0..10).map(Value::Int).collect());
        let idx = find_any_index(&a, |v| match v {
            Value::Int(i) => i - 100,
            _ => unreachable!(),
        });
        assert_eq!(idx, None);
    }
}
