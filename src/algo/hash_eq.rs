//! # **Hash/Equality Module** - *Array-level `==`/`eql?`/`hash` (spec §4.E, §6)*
//!
//! "Identity-short-circuit, length mismatch short-circuit; then element-wise via the
//! embedding's equality. `hash` combines per-element hashes into a seeded rolling mix."
//!
//! Also home to [`HashKey`], the `Hash`/`Eq` adapter over [`Value`]'s `eql?`/`hash` pair
//! (`ElementEql`) that lets a `Value` be used as a `std::collections::HashSet`/`HashMap`
//! key — needed by `uniq` (`structs/array.rs`) and the hash-backed branch of the set
//! operations (`algo/setops.rs`).

#[cfg(feature = "fast_hash")]
pub use ahash::AHashSet as HashSet;
#[cfg(not(feature = "fast_hash"))]
pub use std::collections::HashSet;

use std::hash::{Hash, Hasher};

use crate::enums::value::Value;
use crate::structs::array::RArray;
use crate::traits::element::{ElementEq, ElementEql};

pub fn new_hash_set() -> HashSet<HashKey> {
    HashSet::default()
}

/// Wraps a [`Value`] so it can key a `HashSet`/`HashMap` using `eql?`/`hash` (spec §6:
/// "used by `uniq`, `&`, `|`, and `Array#eql?`") rather than `Hash`/`PartialEq`'s
/// default derivation, which `Value` deliberately does not implement (the `==`/`eql?`
/// distinction is load-bearing, see `traits/element.rs`).
#[derive(Clone)]
pub struct HashKey(pub Value);

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.element_eql(&other.0)
    }
}

impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.element_hash());
    }
}

/// Adapts a `&mut dyn Hasher` into a concrete, `Sized` `Hasher` so `Hash::hash`'s
/// generic `<H: Hasher>` bound can be satisfied with a trait object underneath.
struct HasherAdapter<'a>(&'a mut dyn Hasher);

impl<'a> Hasher for HasherAdapter<'a> {
    fn finish(&self) -> u64 {
        self.0.finish()
    }
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes)
    }
}

/// Structural `==` at the array level: identity short-circuit, length mismatch
/// short-circuit, then element-wise `element_eq`.
pub fn array_eq(a: &RArray, b: &RArray) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    if a.len() != b.len() {
        return false;
    }
    a.to_vec()
        .iter()
        .zip(b.to_vec().iter())
        .all(|(x, y)| x.element_eq(y))
}

/// Strict `eql?` at the array level: same shape, element-wise `element_eql`.
pub fn array_eql(a: &RArray, b: &RArray) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    if a.len() != b.len() {
        return false;
    }
    a.to_vec()
        .iter()
        .zip(b.to_vec().iter())
        .all(|(x, y)| x.element_eql(y))
}

/// `hash` for an array element: seeded with the length, then a rolling mix of each
/// element's own hash, written into the caller's hasher.
pub fn array_hash_into(a: &RArray, hasher: &mut dyn Hasher) {
    let mut adapter = HasherAdapter(hasher);
    a.len().hash(&mut adapter);
    for v in a.to_vec() {
        v.element_hash().hash(&mut adapter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_is_reflexive_and_length_sensitive() {
        let a = RArray::from_vec(vec![Value::Int(1), Value::Int(2)]);
        let b = RArray::from_vec(vec![Value::Int(1), Value::Int(2)]);
        let c = RArray::from_vec(vec![Value::Int(1)]);
        assert!(array_eq(&a, &b));
        assert!(!array_eq(&a, &c));
    }

    #[test]
    fn hash_key_respects_eql_not_eq() {
        let mut set = new_hash_set();
        set.insert(HashKey(Value::Int(3)));
        assert!(!set.contains(&HashKey(Value::Float(3.0))));
        assert!(set.contains(&HashKey(Value::Int(3))));
    }
}
