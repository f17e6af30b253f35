//! # **Permute Module** - *Permutation/combination/product/repeated-permutation visitors*
//!
//! Spec §4.E: "Lexicographic visitors over index tuples; each tuple materializes a
//! result array... Must detect reentrancy: if the source array is visibly modified
//! mid-enumeration... fail with a reentrancy error. Product's result length is
//! bounds-checked against `MAX` before starting."
//!
//! Each visitor here collects every tuple into a `Vec<RArray>` rather than invoking a
//! per-tuple callback — the crate has no block/yield protocol of its own (spec §1:
//! the dispatch layer that binds methods to language-level names is out of scope), so
//! the natural Rust surface is "produce the whole sequence of result arrays," which a
//! caller can then iterate, collect, or fold over as they please.

use crate::enums::error::ArrayError;
use crate::enums::value::Value;
use crate::structs::array::RArray;
use crate::structs::header::MAX_LEN;

fn check_generation(arr: &RArray, gen0: u64, op: &'static str) -> Result<(), ArrayError> {
    if arr.generation() != gen0 {
        Err(ArrayError::Reentrancy { op })
    } else {
        Ok(())
    }
}

/// `k`-permutations of `arr`'s elements (order matters, no repeats), lexicographic
/// over index choice.
pub fn permutations(arr: &RArray, k: usize) -> Result<Vec<RArray>, ArrayError> {
    let items = arr.to_vec();
    let n = items.len();
    if k > n {
        return Ok(Vec::new());
    }
    let gen0 = arr.generation();
    let mut used = vec![false; n];
    let mut current = Vec::with_capacity(k);
    let mut out = Vec::new();
    permute_rec(arr, gen0, &items, &mut used, &mut current, k, &mut out)?;
    Ok(out)
}

fn permute_rec(
    arr: &RArray,
    gen0: u64,
    items: &[Value],
    used: &mut [bool],
    current: &mut Vec<Value>,
    k: usize,
    out: &mut Vec<RArray>,
) -> Result<(), ArrayError> {
    check_generation(arr, gen0, "permutation")?;
    if current.len() == k {
        out.push(RArray::from_vec(current.clone()));
        return Ok(());
    }
    for i in 0..items.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(items[i].clone());
        permute_rec(arr, gen0, items, used, current, k, out)?;
        current.pop();
        used[i] = false;
    }
    Ok(())
}

/// `k`-combinations of `arr`'s elements (order within a combination follows source
/// order, no repeats), lexicographic over index choice.
pub fn combinations(arr: &RArray, k: usize) -> Result<Vec<RArray>, ArrayError> {
    let items = arr.to_vec();
    let n = items.len();
    if k > n {
        return Ok(Vec::new());
    }
    let gen0 = arr.generation();
    let mut combo = Vec::with_capacity(k);
    let mut out = Vec::new();
    combo_rec(arr, gen0, &items, 0, k, &mut combo, &mut out)?;
    Ok(out)
}

fn combo_rec(
    arr: &RArray,
    gen0: u64,
    items: &[Value],
    start: usize,
    k: usize,
    combo: &mut Vec<Value>,
    out: &mut Vec<RArray>,
) -> Result<(), ArrayError> {
    check_generation(arr, gen0, "combination")?;
    if combo.len() == k {
        out.push(RArray::from_vec(combo.clone()));
        return Ok(());
    }
    for i in start..items.len() {
        combo.push(items[i].clone());
        combo_rec(arr, gen0, items, i + 1, k, combo, out)?;
        combo.pop();
    }
    Ok(())
}

/// `k`-length tuples drawn from `arr` with repetition allowed (the cartesian `k`-th
/// power of `arr`).
pub fn repeated_permutation(arr: &RArray, k: usize) -> Result<Vec<RArray>, ArrayError> {
    let items = arr.to_vec();
    let n = items.len() as u128;
    let total = n.checked_pow(k as u32).unwrap_or(u128::MAX);
    if total > MAX_LEN as u128 {
        return Err(ArrayError::SizeLimitExceeded {
            requested: MAX_LEN + 1,
            max: MAX_LEN,
        });
    }
    let gen0 = arr.generation();
    let mut current = Vec::with_capacity(k);
    let mut out = Vec::new();
    rep_rec(arr, gen0, &items, k, &mut current, &mut out)?;
    Ok(out)
}

fn rep_rec(
    arr: &RArray,
    gen0: u64,
    items: &[Value],
    k: usize,
    current: &mut Vec<Value>,
    out: &mut Vec<RArray>,
) -> Result<(), ArrayError> {
    check_generation(arr, gen0, "repeated_permutation")?;
    if current.len() == k {
        out.push(RArray::from_vec(current.clone()));
        return Ok(());
    }
    for v in items {
        current.push(v.clone());
        rep_rec(arr, gen0, items, k, current, out)?;
        current.pop();
    }
    Ok(())
}

/// Cartesian product across `arrays`, in order. Bounds-checks the result count against
/// `MAX_LEN` before doing any work (spec §8 scenario 6).
pub fn product(arrays: &[&RArray]) -> Result<Vec<RArray>, ArrayError> {
    let mut total: u128 = 1;
    for a in arrays {
        total = total.saturating_mul(a.len() as u128);
        if total > MAX_LEN as u128 {
            return Err(ArrayError::SizeLimitExceeded {
                requested: MAX_LEN + 1,
                max: MAX_LEN,
            });
        }
    }
    let gens: Vec<u64> = arrays.iter().map(|a| a.generation()).collect();
    let mut current = Vec::with_capacity(arrays.len());
    let mut out = Vec::new();
    product_rec(arrays, &gens, 0, &mut current, &mut out)?;
    Ok(out)
}

fn product_rec(
    arrays: &[&RArray],
    gens: &[u64],
    idx: usize,
    current: &mut Vec<Value>,
    out: &mut Vec<RArray>,
) -> Result<(), ArrayError> {
    if idx == arrays.len() {
        out.push(RArray::from_vec(current.clone()));
        return Ok(());
    }
    check_generation(arrays[idx], gens[idx], "product")?;
    for v in arrays[idx].to_vec() {
        current.push(v);
        product_rec(arrays, gens, idx + 1, current, out)?;
        current.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(xs: &[i64]) -> RArray {
        RArray::from_vec(xs.iter().map(|&x| Value::Int(x)).collect())
    }

    #[test]
    fn permutations_count_and_shape() {
        let a = ints(&[1, 2, 3]);
        let perms = permutations(&a, 2).unwrap();
        assert_eq!(perms.len(), 6);
        assert!(perms.iter().all(|p| p.len() == 2));
    }

    #[test]
    fn combinations_count() {
        let a = ints(&[1, 2, 3, 4]);
        let combos = combinations(&a, 2).unwrap();
        assert_eq!(combos.len(), 6);
    }

    #[test]
    fn repeated_permutation_count() {
        let a = ints(&[1, 2]);
        let reps = repeated_permutation(&a, 3).unwrap();
        assert_eq!(reps.len(), 8);
    }

    #[test]
    fn product_size_guard_rejects_before_allocating() {
        // The guard only inspects lengths, so two `resize`d-but-nil-filled arrays
        // exercise spec §8 scenario 6 without materializing a real million-by-million
        // product.
        let big1 = RArray::new();
        big1.resize(1_000_000).unwrap();
        let big2 = RArray::new();
        big2.resize(1_000_000).unwrap();
        let err = product(&[&big1, &big2]);
        assert!(matches!(err, Err(ArrayError::SizeLimitExceeded { .. })));
    }
}
