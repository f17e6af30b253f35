//! # **Element Contract** - *What the storage engine requires from its elements*
//!
//! Per spec §6 ("From the element type"): the engine needs two equality flavors that
//! implementers must not assume agree, plus a partial ordering.
//!
//! - [`ElementEq`] backs structural `==` (`include?`, `index`, set difference, `delete`).
//! - [`ElementEql`] backs the stricter `eql?`/`hash` pair (`uniq`, `&`, `|`, `Array#eql?`) —
//!   notably, `eql?` does not coerce across numeric types the way `==` may, and its `hash`
//!   companion must agree with it (`a.eql(b) implies a.hash() == b.hash()`).
//! - [`ElementOrd`] backs `<=>`; a `None` return makes the pair incomparable and aborts the
//!   calling sort/min/max with a comparison error (§7 "Comparison failure").
//!
//! `Value` (`enums/value.rs`) implements all three; they are kept as separate traits so a
//! caller supplying their own element type can satisfy only the subset a given operation needs.

use std::cmp::Ordering;

/// Structural equality, independent of `eql?`/hash semantics.
pub trait ElementEq {
    fn element_eq(&self, other: &Self) -> bool;
}

/// Strict equality plus a compatible hash, used by `uniq` and the hash-backed set operations.
pub trait ElementEql {
    fn element_eql(&self, other: &Self) -> bool;
    fn element_hash(&self) -> u64;
}

/// Partial ordering; `None` signals an incomparable pair.
pub trait ElementOrd {
    fn element_cmp(&self, other: &Self) -> Option<Ordering>;
}
