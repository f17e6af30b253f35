//! # **Header Module** - *Flags Orthogonal to Storage Mode*
//!
//! Implements component A of the storage engine (spec §4.A): "pack the storage-mode
//! bits, the embedded-length field, the frozen bit, and the debug in-use bit into the
//! object header... provide accessors that branch no more than once on the mode bits."
//!
//! This crate reads that requirement idiomatically: the storage-mode bits and the
//! embedded-length field are the discriminant and payload of the [`Storage`](crate::structs::storage::Storage)
//! enum (`match`ing it *is* the single branch), so `Header` itself carries only the
//! flags that are genuinely orthogonal to storage mode — `FROZEN`, and, in debug builds,
//! `PTR_IN_USE`. `SHARED_ROOT` is not tracked here either: it is implied by a `Storage`
//! value actually being aliased (`Rc::strong_count > 1`), so there is no separate bit to
//! keep in sync (see `structs/shared.rs`).

use std::cell::Cell;

/// Elements an embedded array can hold inline. Also the embedded-length field's
/// required range (`0..=EMBED_CAP`), which is why the field is one byte — plenty of
/// headroom versus a host runtime's variable, slot-size-policy-dependent capacity
/// (spec §6: "object size in embedded mode... is not a fixed constant").
pub const EMBED_CAP: usize = 4;

/// The element-count ceiling referenced throughout §3.3/§4/§7 as `MAX`.
pub const MAX_LEN: usize = i64::MAX as usize;

/// Flags orthogonal to the storage-mode discriminant.
#[derive(Debug, Default)]
pub struct Header {
    frozen: Cell<bool>,
    #[cfg(debug_assertions)]
    ptr_in_use: Cell<bool>,
}

impl Header {
    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    /// One-way: spec §3.3 invariant 5, "freezing is one-way."
    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    #[cfg(debug_assertions)]
    pub fn is_ptr_in_use(&self) -> bool {
        self.ptr_in_use.get()
    }

    #[cfg(debug_assertions)]
    pub fn set_ptr_in_use(&self, v: bool) {
        self.ptr_in_use.set(v);
    }
}

impl Clone for Header {
    fn clone(&self) -> Self {
        // A duplicated array starts unfrozen and with no pointer loaned out,
        // matching `a.dup` semantics (spec §8 round-trip laws).
        Header::default()
    }
}
