//! # **Set Operations Module** - *Union, intersection, difference (spec §4.E)*
//!
//! "Small-input heuristic: if all inputs are below a threshold (e.g. 16 elements), use
//! linear scans with `eql?`-based comparison. Otherwise build a hash-backed set over
//! the smaller side and scan the larger. Preserve first-occurrence order from the left
//! operand. Difference/intersection of multiple arrays combines left-to-right."
//!
//! Unlike `uniq` (which always wants a full hash-backed dedup set since it must visit
//! every element anyway), the linear-scan branch here is a genuine algorithmic choice:
//! below the threshold, the per-element hash/bucket overhead of a `HashSet` typically
//! costs more than a linear `eql?` scan over a handful of elements.

use crate::algo::hash_eq::HashKey;
use crate::enums::value::Value;
use crate::structs::array::RArray;
use crate::traits::element::ElementEql;

/// Below this combined size, linear `eql?` scans are used instead of a hash set (spec
/// §4.E: "e.g. 16 elements").
const SMALL_THRESHOLD: usize = 16;

/// Left-to-right union, preserving first-occurrence order from the left operand.
pub fn union(arrays: &[&RArray]) -> RArray {
    let mut out: Vec<Value> = Vec::new();
    if arrays.iter().all(|a| a.len() <= SMALL_THRESHOLD) {
        for a in arrays {
            for v in a.to_vec() {
                if !out.iter().any(|o| o.element_eql(&v)) {
                    out.push(v);
                }
            }
        }
    } else {
        let mut seen = crate::algo::hash_eq::new_hash_set();
        for a in arrays {
            for v in a.to_vec() {
                if seen.insert(HashKey(v.clone())) {
                    out.push(v);
                }
            }
        }
    }
    RArray::from_vec(out)
}

/// Intersection of two arrays, preserving first-occurrence order from `a`, each
/// element appearing at most once.
pub fn intersection(a: &RArray, b: &RArray) -> RArray {
    let bvec = b.to_vec();
    let avec = a.to_vec();
    let mut out = Vec::new();
    if avec.len() > SMALL_THRESHOLD || bvec.len() > SMALL_THRESHOLD {
        let bset: crate::algo::hash_eq::HashSet<HashKey> =
            bvec.iter().cloned().map(HashKey).collect();
        let mut seen = crate::algo::hash_eq::new_hash_set();
        for v in avec {
            let k = HashKey(v.clone());
            if bset.contains(&k) && seen.insert(HashKey(v.clone())) {
                out.push(v);
            }
        }
    } else {
        let mut seen_out: Vec<Value> = Vec::new();
        for v in avec {
            if bvec.iter().any(|o| o.element_eql(&v)) && !seen_out.iter().any(|o| o.element_eql(&v)) {
                seen_out.push(v.clone());
                out.push(v);
            }
        }
    }
    RArray::from_vec(out)
}

/// Difference of `arrays[0] - arrays[1] - arrays[2] - ...`, combined left-to-right.
pub fn difference(arrays: &[&RArray]) -> RArray {
    if arrays.is_empty() {
        return RArray::new();
    }
    let mut out = arrays[0].to_vec();
    for other in &arrays[1..] {
        let ovec = other.to_vec();
        if out.len() > SMALL_THRESHOLD || ovec.len() > SMALL_THRESHOLD {
            let oset: crate::algo::hash_eq::HashSet<HashKey> =
                ovec.iter().cloned().map(HashKey).collect();
            out.retain(|v| !oset.contains(&HashKey(v.clone())));
        } else {
            out.retain(|v| !ovec.iter().any(|o| o.element_eql(v)));
        }
    }
    RArray::from_vec(out)
}
