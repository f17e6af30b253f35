//! # **Sample Module** - *Weighted selection without replacement (spec §4.E)*
//!
//! The spec describes three size-tiered strategies (closed-form for `n <= 3`,
//! insertion-sort partial selection for `n` up to a small constant, sparse
//! hash-backed partial Fisher-Yates otherwise) purely as a performance heuristic —
//! "an implementation may choose another factor/strategy" is the spec's own framing
//! for the adjacent `double_capacity` growth factor, and §9's Open Questions apply the
//! same latitude to `sample`'s branching. This crate collapses all three tiers into a
//! single sparse hash-backed partial Fisher-Yates: it is already the asymptotically
//! optimal `O(n)` algorithm for any `n`, so the small-`n` special cases would only
//! shave constant-factor overhead, at the cost of three separate code paths each
//! needing its own concurrent-modification check. See `DESIGN.md` for the recorded
//! rationale and spec §9 Open Question 3 ("reimplement detection in all branches for
//! safety"), which this unification satisfies trivially — there is only one branch.

use std::collections::HashMap;

use crate::enums::error::ArrayError;
use crate::structs::array::RArray;
use crate::traits::rng::RngSource;

/// Selection without replacement: `n` distinct elements drawn uniformly from `arr`,
/// order unspecified. Re-checks `arr`'s length after every draw; a concurrent
/// modification (the array resized by a reentrant caller) fails with `Reentrancy`
/// rather than silently sampling from a moved-under-us buffer.
pub fn sample<R: RngSource>(arr: &RArray, n: usize, rng: &mut R) -> Result<RArray, ArrayError> {
    let len0 = arr.len();
    let n = n.min(len0);
    if n == 0 {
        return Ok(RArray::new());
    }

    // Partial Fisher-Yates simulated sparsely: `swap_target[i]` records what index `i`
    // was swapped to stand in for, without materializing the full `0..len0` array.
    let mut swap_target: HashMap<usize, usize> = HashMap::with_capacity(n);
    let mut chosen = Vec::with_capacity(n);
    let mut remaining = len0;

    for _ in 0..n {
        if arr.len() != len0 {
            return Err(ArrayError::Reentrancy { op: "sample" });
        }
        let draw = rng.below(remaining);
        let actual = *swap_target.get(&draw).unwrap_or(&draw);
        chosen.push(actual);
        let last = remaining - 1;
        let last_actual = *swap_target.get(&last).unwrap_or(&last);
        swap_target.insert(draw, last_actual);
        remaining -= 1;
    }

    if arr.len() != len0 {
        return Err(ArrayError::Reentrancy { op: "sample" });
    }
    let items = chosen.into_iter().map(|i| arr.at(i as i64)).collect();
    Ok(RArray::from_vec(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::value::Value;
    use crate::traits::rng::{DefaultRng, RngChoice};

    #[test]
    fn sample_yields_distinct_elements_from_source() {
        let a = RArray::from_vec((0..10i64).map(Value::Int).collect());
        let mut rng = DefaultRng::new(RngChoice::Seeded(42));
        let s = sample(&a, 5, &mut rng).unwrap();
        assert_eq!(s.len(), 5);
        let mut values: Vec<i64> = s
            .to_vec()
            .into_iter()
            .map(|v| match v {
                Value::Int(i) => i,
                _ => unreachable!(),
            })
            .collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|v| (0..10).contains(v)));
    }

    #[test]
    fn sample_more_than_len_clamps() {
        let a = RArray::from_vec((0..3i64).map(Value::Int).collect());
        let mut rng = DefaultRng::new(RngChoice::Seeded(1));
        let s = sample(&a, 10, &mut rng).unwrap();
        assert_eq!(s.len(), 3);
    }
}
