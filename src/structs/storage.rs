//! # **Storage Module** - *Tri-modal element storage (component B)*
//!
//! Implements the storage-mode manager of spec §4.B: `resize_capacity`, `double_capacity`,
//! `shrink_to_len`, `make_embedded_if_possible`. The three physical layouts of spec §3.2
//! are represented as the discriminant of [`Storage<T>`] — reading the spec's own §9 guidance
//! literally: "a tagged enum storing either `[InlineBuf<N>; len]`, `Vec<T>`, or
//! `{ root: Arc<Root>, start, len }`".
//!
//! The embedded slot is `[Option<T>; EMBED_CAP]` rather than `MaybeUninit<T>` plus manual
//! drop bookkeeping: this keeps component B entirely in safe Rust at the cost of one
//! discriminant word per embedded slot, which for `EMBED_CAP = 4` is noise. See `DESIGN.md`.
//!
//! The shared root (`Rc<RefCell<Vec<T>>>`) is covered in `structs/shared.rs`; this module
//! only handles capacity management for `Embedded`/`Owned` and leaves `Shared` storage
//! alone (spec §4.B: "must not be applied to a `SHARED` array; caller must cancel sharing
//! first").

use std::cell::RefCell;
use std::rc::Rc;

use crate::enums::error::ArrayError;
use crate::structs::header::{EMBED_CAP, MAX_LEN};

/// The three physical layouts of spec §3.2.
pub enum Storage<T> {
    /// Elements live inline; no separate allocation (spec §3.2.1).
    Embedded { buf: [Option<T>; EMBED_CAP], len: u8 },
    /// A separately allocated, exclusively owned buffer (spec §3.2.2).
    Owned(Vec<T>),
    /// A view into another array's buffer (spec §3.2.3). `start..start+len` must lie
    /// within `root`'s current length (spec §3.3 invariant 3).
    Shared {
        root: Rc<RefCell<Vec<T>>>,
        start: usize,
        len: usize,
    },
}

impl<T> Storage<T> {
    pub fn empty_embedded() -> Self {
        Storage::Embedded {
            buf: [None, None, None, None],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Storage::Embedded { len, .. } => *len as usize,
            Storage::Owned(v) => v.len(),
            Storage::Shared { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Storage::Shared { .. })
    }

    pub fn capacity(&self) -> usize {
        match self {
            Storage::Embedded { .. } => EMBED_CAP,
            Storage::Owned(v) => v.capacity(),
            // Only the viewed window is addressable; matches `Buffer::capacity`'s
            // treatment of shared storage in the teacher crate.
            Storage::Shared { len, .. } => *len,
        }
    }
}

impl<T: Clone> Storage<T> {
    /// Ensure `Owned`/`Embedded` storage can hold `cap` elements without reallocating
    /// again. Spec §4.B: no-op if embedded and `cap` fits; otherwise promote to `Owned`
    /// with a heap buffer of size `cap`; if already `Owned`, reserve in place.
    pub fn resize_capacity(&mut self, cap: usize) -> Result<(), ArrayError> {
        if cap > MAX_LEN {
            return Err(ArrayError::SizeLimitExceeded {
                requested: cap,
                max: MAX_LEN,
            });
        }
        match self {
            Storage::Shared { .. } => {
                unreachable!("resize_capacity must not run on Shared storage; cancel sharing first")
            }
            Storage::Embedded { buf, len } => {
                if cap <= EMBED_CAP {
                    return Ok(());
                }
                let n = *len as usize;
                let mut v = Vec::with_capacity(cap);
                for slot in buf.iter_mut().take(n) {
                    v.push(slot.take().expect("embedded slot within len is occupied"));
                }
                *self = Storage::Owned(v);
                Ok(())
            }
            Storage::Owned(v) => {
                if v.capacity() < cap {
                    v.reserve(cap - v.len());
                }
                Ok(())
            }
        }
    }

    /// Amortized growth target: `max(min, ceil(1.5 * capa))`, clamped at `MAX_LEN`
    /// (spec §4.B, Open Question 1 resolved to 1.5x in `SPEC_FULL.md`).
    pub fn double_capacity(&mut self, min: usize) -> Result<(), ArrayError> {
        let cur_cap = self.capacity();
        let grown = cur_cap + cur_cap.div_ceil(2);
        let target = grown.max(min).min(MAX_LEN);
        if min > MAX_LEN {
            return Err(ArrayError::SizeLimitExceeded {
                requested: min,
                max: MAX_LEN,
            });
        }
        self.resize_capacity(target)
    }

    /// If heap-owned and capacity exceeds length, reallocate down to length exactly
    /// (spec §4.B).
    pub fn shrink_to_len(&mut self) {
        if let Storage::Owned(v) = self {
            if v.capacity() > v.len() {
                v.shrink_to_fit();
            }
        }
    }

    /// If heap-owned, not shared, and length fits the embedded slot, move elements
    /// inline and free the heap buffer (spec §4.B). Shared storage is excluded by
    /// construction — this is only ever called on `Owned` storage by component D.
    pub fn make_embedded_if_possible(&mut self) {
        if let Storage::Owned(v) = self {
            if v.len() <= EMBED_CAP {
                let mut buf: [Option<T>; EMBED_CAP] = [None, None, None, None];
                let n = v.len();
                for (slot, val) in buf.iter_mut().zip(v.drain(..)) {
                    *slot = Some(val);
                }
                *self = Storage::Embedded { buf, len: n as u8 };
            }
        }
    }

    /// `true` iff currently `Embedded` (used by `replace` to decide whether the
    /// source can be deep-copied directly instead of promoted to a shared root).
    pub fn is_embedded(&self) -> bool {
        matches!(self, Storage::Embedded { .. })
    }

    /// Read a single element by in-bounds index, regardless of storage mode.
    pub fn get(&self, i: usize) -> Option<T> {
        match self {
            Storage::Embedded { buf, len } => {
                if i < *len as usize {
                    buf[i].clone()
                } else {
                    None
                }
            }
            Storage::Owned(v) => v.get(i).cloned(),
            Storage::Shared { root, start, len } => {
                if i < *len {
                    Some(root.borrow()[*start + i].clone())
                } else {
                    None
                }
            }
        }
    }

    /// Overwrite an already-in-bounds element. Never called on `Shared` storage —
    /// every mutation primitive cancels sharing first (spec §4.D).
    pub fn set(&mut self, i: usize, val: T) {
        match self {
            Storage::Embedded { buf, len } => {
                debug_assert!(i < *len as usize);
                buf[i] = Some(val);
            }
            Storage::Owned(v) => v[i] = val,
            Storage::Shared { .. } => {
                unreachable!("Storage::set called on Shared storage; cancel sharing first")
            }
        }
    }

    /// Materialise the logical contents as an owned `Vec`, regardless of mode. Used by
    /// algorithms (sort, uniq, flatten, set ops, sum) that need a private snapshot.
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Storage::Embedded { buf, len } => buf[..*len as usize]
                .iter()
                .map(|o| o.clone().expect("embedded slot within len is occupied"))
                .collect(),
            Storage::Owned(v) => v.clone(),
            Storage::Shared { root, start, len } => root.borrow()[*start..*start + *len].to_vec(),
        }
    }

    /// Build fresh, non-shared storage from a plain `Vec`, choosing `Embedded` when it
    /// fits and `Owned` otherwise. Used to install the result of algorithms that
    /// materialise a whole new element sequence (splice, replace, sort, uniq, compact).
    pub fn from_vec(v: Vec<T>) -> Self {
        if v.len() <= EMBED_CAP {
            let mut buf: [Option<T>; EMBED_CAP] = [None, None, None, None];
            let n = v.len();
            for (slot, val) in buf.iter_mut().zip(v) {
                *slot = Some(val);
            }
            Storage::Embedded { buf, len: n as u8 }
        } else {
            Storage::Owned(v)
        }
    }
}
