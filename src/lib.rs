//! # **dynarray** – A tri-modal, copy-on-write dynamic array storage engine
//!
//! A dynamic, ordered, heterogeneously-typed sequence container built around the
//! storage engine of a dynamic-language runtime's array type: elements live
//! **embedded** in the object header, in a separately **owned** heap buffer, or as a
//! **shared** view into another array's buffer, with transparent, mutation-driven
//! transitions between the three and copy-on-write sharing backed by reference
//! counting.
//!
//! ## What this crate is
//!
//! The storage engine — not the surface API — is the point. [`RArray`] exposes
//! general sequence operations (indexing, slicing, push/pop/shift/unshift, splice,
//! sort, set operations, sampling, permutation/combination generation), but the
//! engineering effort is in how those operations pick between the three physical
//! layouts without ever letting a caller observe a torn or partially-mutated state.
//!
//! ## Layout
//!
//! - [`structs::header`] — flags orthogonal to storage mode (frozen, debug
//!   pointer-in-use), plus the embedded-capacity/length-field constants.
//! - [`structs::storage`] — the tri-modal [`Storage`](structs::storage::Storage) enum
//!   and its capacity-management operations.
//! - [`structs::shared`] — copy-on-write sharing: promotion to a shared root, view
//!   creation, cancel-sharing, and the "room for unshift" fast path.
//! - [`structs::array`] — [`RArray`] itself: the mutation primitives (push, pop,
//!   shift, unshift, splice, store, resize, clear, replace, reverse, rotate, sort,
//!   uniq, compact, flatten) that glue the above together.
//! - [`algo`] — the thinner algorithmic surface built on top: binary search, sampling,
//!   shuffling, permutation/combination/product visitors, set operations, join, and
//!   compensated summation.
//! - [`enums::value`] — [`Value`], the default element type (closed
//!   nil/bool/int/float/string/array/custom enum), and [`ArrayError`], the crate-wide
//!   error type.
//! - [`traits`] — the boundaries the engine needs from the outside world: element
//!   equality/ordering ([`ElementEq`]/[`ElementEql`]/[`ElementOrd`]), a garbage
//!   collector's write-barrier hooks ([`GcHooks`]), and a randomness source
//!   ([`RngSource`]), each with a usable default so the crate works standalone.
//!
//! ## Concurrency
//!
//! Single-threaded by design (`RArray` holds `Rc`/`RefCell`/`Cell` throughout, so it is
//! neither `Send` nor `Sync`), matching the cooperative, single-threaded runtime this
//! engine was modelled on. Reentrancy *within* a thread — a sort comparator or uniq
//! block mutating, freezing, or replacing the array it's being called from — is
//! handled explicitly; see [`RArray::sort_by`](structs::array::RArray::sort_by) and the
//! module docs on [`structs::array`].

/// [`Value`], [`ArrayHandle`], and [`ArrayError`] — the default element type and the
/// crate-wide error type.
pub mod enums {
    pub mod error;
    pub mod value;
}

/// [`RArray`] and the tri-modal storage engine beneath it.
pub mod structs {
    pub mod array;
    pub mod header;
    pub mod shared;
    pub mod storage;
}

/// Collaboration boundaries: element equality/ordering, GC hooks, RNG source, and the
/// escape hatch for custom element payloads.
pub mod traits {
    pub mod custom_value;
    pub mod element;
    pub mod gc;
    pub mod rng;
}

/// The algorithmic surface: binary search, sampling, shuffling, permutation/
/// combination/product visitors, set operations, join, and summation.
pub mod algo;

pub use enums::error::ArrayError;
pub use enums::value::{ArrayHandle, Value};
pub use structs::array::RArray;
pub use structs::header::{EMBED_CAP, MAX_LEN};
pub use traits::custom_value::CustomValue;
pub use traits::element::{ElementEq, ElementEql, ElementOrd};
pub use traits::gc::{GcHooks, NullGc, SizeClass};
pub use traits::rng::{DefaultRng, RngChoice, RngSource};
