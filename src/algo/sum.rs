//! # **Sum Module** - *Compensated summation (spec §4.E)*
//!
//! "Three-phase Kahan-Babuska compensated summation specialized for floating-point
//! tail while fixnums/bignums/rationals are accumulated exactly as long as they
//! appear; transition to floating-point when a float is first encountered... preserve
//! the contract that summing all-integer input never loses precision."
//!
//! `Value` has no bignum/rational variant (spec §0: `Value` is intentionally minimal),
//! so the "exact" phase here is plain `i128` accumulation (wide enough that realistic
//! `i64` inputs cannot overflow it) rather than a true arbitrary-precision integer; the
//! phase transition and the Neumaier-variant compensated float summation are otherwise
//! as specified.

use crate::enums::error::ArrayError;
use crate::enums::value::Value;
use crate::structs::array::RArray;

enum Accum {
    Exact(i128),
    Float { sum: f64, c: f64 },
}

fn kahan_add(sum: &mut f64, c: &mut f64, x: f64) {
    if sum.is_nan() || x.is_nan() {
        *sum = f64::NAN;
        *c = 0.0;
        return;
    }
    if sum.is_infinite() || x.is_infinite() {
        let combined = *sum + x;
        *sum = combined;
        *c = 0.0;
        return;
    }
    let t = *sum + x;
    if sum.abs() >= x.abs() {
        *c += (*sum - t) + x;
    } else {
        *c += (x - t) + *sum;
    }
    *sum = t;
}

/// Sums `arr`'s elements, which must all be `Int` or `Float`. Exact while only `Int`s
/// have appeared; switches to compensated floating-point accumulation on the first
/// `Float`.
pub fn sum(arr: &RArray) -> Result<Value, ArrayError> {
    let mut accum = Accum::Exact(0);
    for v in arr.to_vec() {
        match (&mut accum, &v) {
            (Accum::Exact(acc), Value::Int(i)) => *acc += *i as i128,
            (Accum::Exact(acc), Value::Float(f)) => {
                let base = *acc as f64;
                let mut sum = base;
                let mut c = 0.0;
                kahan_add(&mut sum, &mut c, *f);
                accum = Accum::Float { sum, c };
            }
            (Accum::Float { sum, c }, Value::Int(i)) => kahan_add(sum, c, *i as f64),
            (Accum::Float { sum, c }, Value::Float(f)) => kahan_add(sum, c, *f),
            (_, other) => {
                return Err(ArrayError::ArgumentType {
                    expected: "numeric",
                    message: Some(format!("{other:?} is not summable")),
                })
            }
        }
    }
    Ok(match accum {
        Accum::Exact(i) => Value::Int(i as i64),
        Accum::Float { sum, c } => Value::Float(sum + c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_integer_sum_is_exact() {
        let a = RArray::from_vec(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(sum(&a).unwrap(), Value::Int(6));
    }

    #[test]
    fn mixed_sum_switches_to_float() {
        let a = RArray::from_vec(vec![Value::Int(1), Value::Float(0.5)]);
        assert_eq!(sum(&a).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn nan_propagates() {
        let a = RArray::from_vec(vec![Value::Float(f64::NAN), Value::Float(1.0)]);
        match sum(&a).unwrap() {
            Value::Float(f) => assert!(f.is_nan()),
            _ => panic!("expected float"),
        }
    }

    #[test]
    fn non_numeric_element_errors() {
        let a = RArray::from_vec(vec![Value::Int(1), Value::str("x")]);
        assert!(sum(&a).is_err());
    }
}
