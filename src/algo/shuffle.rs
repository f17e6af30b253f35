//! # **Shuffle Module** - *Fisher-Yates shuffle, whole-array copy and in-place (spec §4.E)*

use crate::enums::error::ArrayError;
use crate::structs::array::RArray;
use crate::traits::rng::RngSource;

/// Fisher-Yates on a copy of `arr`'s contents; returns a new array.
pub fn shuffle<R: RngSource>(arr: &RArray, rng: &mut R) -> RArray {
    let mut v = arr.to_vec();
    for i in (1..v.len()).rev() {
        let j = rng.below(i + 1);
        v.swap(i, j);
    }
    RArray::from_vec(v)
}

/// In-place Fisher-Yates. Detects concurrent modification by comparing `len` before
/// each swap — a shuffle is not reentrancy-safe against itself, but a pathological
/// `RngSource` implementation that calls back into `arr` (or another thread touching
/// it, though the engine makes no cross-thread promise) will still be caught.
pub fn shuffle_in_place<R: RngSource>(arr: &RArray, rng: &mut R) -> Result<(), ArrayError> {
    arr.modify_for_external_mutation()?;
    let len = arr.len();
    for i in (1..len).rev() {
        let before = arr.len();
        let j = rng.below(i + 1);
        if arr.len() != before {
            return Err(ArrayError::Reentrancy { op: "shuffle" });
        }
        arr.swap_indices(i, j)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::value::Value;
    use crate::traits::rng::{DefaultRng, RngChoice};

    #[test]
    fn shuffle_preserves_multiset() {
        let a = RArray::from_vec((0..20i64).map(Value::Int).collect());
        let mut rng = DefaultRng::new(RngChoice::Seeded(7));
        let shuffled = shuffle(&a, &mut rng);
        let mut before: Vec<i64> = a
            .to_vec()
            .into_iter()
            .map(|v| match v {
                Value::Int(i) => i,
                _ => unreachable!(),
            })
            .collect();
        let mut after: Vec<i64> = shuffled
            .to_vec()
            .into_iter()
            .map(|v| match v {
                Value::Int(i) => i,
                _ => unreachable!(),
            })
            .collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn shuffle_in_place_preserves_multiset() {
        let a = RArray::from_vec((0..20i64).map(Value::Int).collect());
        let mut rng = DefaultRng::new(RngChoice::Seeded(9));
        shuffle_in_place(&a, &mut rng).unwrap();
        let mut after: Vec<i64> = a
            .to_vec()
            .into_iter()
            .map(|v| match v {
                Value::Int(i) => i,
                _ => unreachable!(),
            })
            .collect();
        after.sort();
        assert_eq!(after, (0..20).collect::<Vec<_>>());
    }
}
