//! # **Parallel Module** - *Rayon-backed read-only fast paths, gated by `parallel_proc`*
//!
//! Mirrors the teacher's `Buffer::par_iter`/`par_iter_mut` (`structs/buffer.rs`), but
//! this crate's element type is `Value`, which carries `Rc` in three of its variants
//! and is therefore neither `Send` nor `Sync` — rayon cannot parallelize over `&[Value]`
//! at all, let alone mutably. The fast paths here sidestep that by first taking a
//! private, sequential snapshot into a plain `Vec<f64>` (itself `Send + Sync`, with none
//! of `Value`'s `Rc` baggage) and only parallelizing over *that*. This is the "plain
//! heap-owned array" the ambient dependency notes refer to: a bare numeric buffer, not
//! `RArray`'s own `Storage::Owned(Vec<Value>)`.

use rayon::prelude::*;

use crate::enums::error::ArrayError;
use crate::enums::value::Value;
use crate::structs::array::RArray;

/// Sequential, order-preserving snapshot of `arr` as `f64`, or an error naming the
/// first non-numeric element encountered. Shared by every parallel fast path below so
/// each one fails the same way `algo::sum::sum` does on non-numeric input.
fn numeric_snapshot(arr: &RArray) -> Result<Vec<f64>, ArrayError> {
    arr.to_vec()
        .into_iter()
        .map(|v| match v {
            Value::Int(i) => Ok(i as f64),
            Value::Float(f) => Ok(f),
            other => Err(ArrayError::ArgumentType {
                expected: "numeric",
                message: Some(format!("{other:?} is not summable")),
            }),
        })
        .collect()
}

/// Parallel counterpart to [`crate::algo::sum::sum`]: same numeric-only contract, but
/// reduced with a plain pairwise `+` across rayon's work-stealing pool instead of the
/// sequential path's Kahan–Neumaier compensation. Faster on large arrays; less precise
/// on adversarial inputs (large cancelling floats) — use the sequential `sum` when
/// reproducible, compensated precision matters more than throughput.
pub fn sum_parallel(arr: &RArray) -> Result<Value, ArrayError> {
    let snapshot = numeric_snapshot(arr)?;
    let total = snapshot.par_iter().copied().sum::<f64>();
    if snapshot.iter().all(|x| x.fract() == 0.0 && x.is_finite()) {
        // Every element round-trips through f64 as a whole number, so round-tripping
        // the reduced total back through i64 reproduces the exact integer sum (spec
        // §4.E's "never loses precision" guarantee for all-integer input), matching
        // `sum`'s exact phase rather than reporting a float for an all-integer array.
        return Ok(Value::Int(total as i64));
    }
    Ok(Value::Float(total))
}

/// Runs `f` over every numeric element of `arr` across rayon's pool. `f` only ever
/// observes plain `f64`s, never a `Value`, so it can be an ordinary `Fn(f64) + Sync`
/// closure with no `Rc`/thread-safety concerns of its own.
pub fn par_for_each_numeric<F>(arr: &RArray, f: F) -> Result<(), ArrayError>
where
    F: Fn(f64) + Sync,
{
    let snapshot = numeric_snapshot(arr)?;
    snapshot.par_iter().copied().for_each(f);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_parallel_matches_sequential_on_integers() {
        let a = RArray::from_vec((1..=1000i64).map(Value::Int).collect());
        let expected: i64 = (1..=1000i64).sum();
        assert_eq!(sum_parallel(&a).unwrap(), Value::Int(expected));
    }

    #[test]
    fn sum_parallel_rejects_non_numeric() {
        let a = RArray::from_vec(vec![Value::Int(1), Value::str("x")]);
        assert!(sum_parallel(&a).is_err());
    }

    #[test]
    fn par_for_each_numeric_visits_every_element() {
        use std::sync::atomic::{AtomicI64, Ordering};
        let a = RArray::from_vec((1..=100i64).map(Value::Int).collect());
        let total = AtomicI64::new(0);
        par_for_each_numeric(&a, |x| {
            total.fetch_add(x as i64, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(total.load(Ordering::Relaxed), (1..=100i64).sum());
    }
}
