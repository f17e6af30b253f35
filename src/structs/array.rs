//! # **Array Module** - *`RArray`, the public storage-engine object (components A-D glued together)*
//!
//! `RArray` is the concrete, non-generic sequence container the rest of the crate's
//! modules (`algo/`) operate on. It is non-generic over its element type — it always
//! stores [`Value`](crate::enums::value::Value) — because `Value::Array` is
//! self-referential (spec §8 scenario 3: `a.push(a)`), which a type parameter cannot
//! express without a recursive type definition. The engine's genericity instead lives
//! at the trait boundary (`ElementEq`/`ElementEql`/`ElementOrd`, `structs::storage::Storage<T>`),
//! and `Value` is simply the one instantiation this crate ships.
//!
//! Every mutating method takes `&self`: `RArray` is an object with identity (spec §3.1,
//! "an array is an object header plus a discriminated body"), and interior mutability
//! via `RefCell`/`Cell` is the idiomatic Rust reading of that — the same call this
//! crate already made for `Header` (`structs/header.rs`).

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::algo::hash_eq::{array_eq, array_eql, array_hash_into};
use crate::enums::error::ArrayError;
use crate::enums::value::Value;
use crate::structs::header::{Header, EMBED_CAP, MAX_LEN};
use crate::structs::shared::{
    cancel_sharing, create_view, pop_back, promote_to_shared_root, shares_storage_with,
    shift_front, try_push_into_slack, try_unshift_in_place,
};
use crate::structs::storage::Storage;
use crate::traits::element::ElementOrd;

/// Below this, `pop`'s shrink heuristic (spec §4.D: "if `len < capa/3` and `capa >
/// default`") never kicks in — matches the teacher's small-buffer tolerance in spirit.
const DEFAULT_CAPACITY: usize = 8;

/// `Owned` arrays longer than this promote to a shared root on `shift` rather than
/// memmove the tail down (spec §4.D: "for large non-shared arrays, promote... for
/// small arrays, memmove"). Unreviewed heuristic, same status as the steal threshold
/// in `cancel_sharing` (spec §9 Open Questions).
const SHIFT_PROMOTE_THRESHOLD: usize = 32;

/// The tri-modal, copy-on-write sequence container (spec §3-§4).
pub struct RArray {
    header: Header,
    storage: RefCell<Storage<Value>>,
    /// Reentrancy marker (spec §5/§9): bumped on every structural mutation. A callback
    /// (sort comparator, uniq/bsearch block, permutation visitor) that observes this
    /// having changed has detected that the array was tampered with mid-operation —
    /// the self-contained equivalent of the source runtime's "class pointer cleared"
    /// sentinel.
    generation: Cell<u64>,
}

impl RArray {
    pub fn new() -> Self {
        RArray {
            header: Header::default(),
            storage: RefCell::new(Storage::empty_embedded()),
            generation: Cell::new(0),
        }
    }

    /// spec §3.4 Creation: pre-sized, embedded if it fits, heap-owned otherwise.
    /// Rejects `cap >= MAX` or `cap < 0`.
    pub fn with_capacity(cap: i64) -> Result<Self, ArrayError> {
        if cap < 0 {
            return Err(ArrayError::NegativeSize { requested: cap });
        }
        let cap = cap as usize;
        if cap >= MAX_LEN {
            return Err(ArrayError::SizeLimitExceeded {
                requested: cap,
                max: MAX_LEN,
            });
        }
        let storage = if cap <= EMBED_CAP {
            Storage::empty_embedded()
        } else {
            Storage::Owned(Vec::with_capacity(cap))
        };
        Ok(RArray {
            header: Header::default(),
            storage: RefCell::new(storage),
            generation: Cell::new(0),
        })
    }

    pub fn from_vec(v: Vec<Value>) -> Self {
        RArray {
            header: Header::default(),
            storage: RefCell::new(Storage::from_vec(v)),
            generation: Cell::new(0),
        }
    }

    /// Process-wide (here: per-thread — see `DESIGN.md`) canonical empty frozen array,
    /// used as a default-argument sentinel (spec §9 "Global state").
    pub fn empty_frozen() -> Rc<RArray> {
        thread_local! {
            static EMPTY_FROZEN: Rc<RArray> = Rc::new({
                let a = RArray::new();
                a.freeze();
                a
            });
        }
        EMPTY_FROZEN.with(|a| a.clone())
    }

    pub fn len(&self) -> usize {
        self.storage.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.borrow().capacity()
    }

    pub fn is_frozen(&self) -> bool {
        self.header.is_frozen()
    }

    /// One-way (spec §3.3 invariant 5). Also shrinks the heap buffer to `len` exactly
    /// when freezing a non-shared, non-root, non-embedded array (spec §3.4 "Shrink at
    /// freeze").
    pub fn freeze(&self) {
        self.header.freeze();
        self.storage.borrow_mut().shrink_to_len();
    }

    pub fn is_shared(&self) -> bool {
        self.storage.borrow().is_shared()
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    fn bump_generation(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    /// spec §3.4/§4.D "modify check" + "cancel-sharing step": fail if frozen, then
    /// detach from any shared root. Used by every primitive except the fast-pathed
    /// push/pop/shift/unshift, which have their own, cheaper protocols.
    fn modify(&self) -> Result<(), ArrayError> {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        let mut st = self.storage.borrow_mut();
        if st.is_shared() {
            cancel_sharing(&mut st);
        }
        Ok(())
    }

    /// Resolve a (possibly negative) logical index against the current length, without
    /// bounds-checking the result. Negative indices count from the end (spec §8
    /// boundary behaviors).
    fn resolve_index(&self, i: i64) -> i64 {
        if i < 0 {
            i + self.len() as i64
        } else {
            i
        }
    }

    /// `a[i]`. Out-of-range (including `i == len`, per spec §8) returns `nil`, not an
    /// error — this is a read, not a mutation, so there is no `Result` here.
    pub fn at(&self, i: i64) -> Value {
        let idx = self.resolve_index(i);
        if idx < 0 {
            return Value::Nil;
        }
        self.storage
            .borrow()
            .get(idx as usize)
            .unwrap_or(Value::Nil)
    }

    /// spec §4.D `store(i, v)`. Negative `i` resolved against length; still negative
    /// after resolution fails out-of-range. `i >= len` grows the array, nil-filling the
    /// gap.
    pub fn store(&self, i: i64, v: Value) -> Result<(), ArrayError> {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        let idx = self.resolve_index(i);
        if idx < 0 {
            return Err(ArrayError::IndexOutOfRange {
                index: i,
                len: self.len(),
            });
        }
        let idx = idx as usize;
        if idx >= MAX_LEN {
            return Err(ArrayError::SizeLimitExceeded {
                requested: idx + 1,
                max: MAX_LEN,
            });
        }

        let mut st = self.storage.borrow_mut();
        if st.is_shared() {
            cancel_sharing(&mut st);
        }
        let cur_len = st.len();
        if idx >= cur_len {
            let new_len = idx + 1;
            if new_len > st.capacity() {
                st.resize_capacity(new_len)?;
            }
            match &mut *st {
                Storage::Embedded { buf, len } => {
                    for slot in buf.iter_mut().take(idx).skip(cur_len) {
                        *slot = Some(Value::Nil);
                    }
                    buf[idx] = Some(v);
                    *len = new_len as u8;
                }
                Storage::Owned(vec) => {
                    vec.resize(idx, Value::Nil);
                    vec.push(v);
                }
                Storage::Shared { .. } => unreachable!("cancel_sharing ran above"),
            }
        } else {
            st.set(idx, v);
        }
        drop(st);
        self.bump_generation();
        Ok(())
    }

    /// spec §4.D `push`. Amortized O(1); if the array is a `Shared` view with trailing
    /// slack in its root, writes in place without detaching at all (spec §4.D "the
    /// cancel-sharing step is skipped in this fast path").
    pub fn push(&self, v: Value) -> Result<(), ArrayError> {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        let mut st = self.storage.borrow_mut();
        if st.is_shared() {
            match try_push_into_slack(&mut st, v) {
                Ok(()) => {
                    drop(st);
                    self.bump_generation();
                    return Ok(());
                }
                Err(v) => {
                    cancel_sharing(&mut st);
                    return self.push_into_owned(&mut st, v);
                }
            }
        }
        self.push_into_owned(&mut st, v)
    }

    fn push_into_owned(&self, st: &mut Storage<Value>, v: Value) -> Result<(), ArrayError> {
        let len = st.len();
        if len >= MAX_LEN {
            return Err(ArrayError::SizeLimitExceeded {
                requested: len + 1,
                max: MAX_LEN,
            });
        }
        if len + 1 > st.capacity() {
            st.double_capacity(len + 1)?;
        }
        match st {
            Storage::Embedded { buf, len } => {
                buf[*len as usize] = Some(v);
                *len += 1;
            }
            Storage::Owned(vec) => vec.push(v),
            Storage::Shared { .. } => unreachable!("caller cancelled sharing above"),
        }
        self.bump_generation();
        Ok(())
    }

    /// spec §4.D `concat`/`cat`: append many, amortized, same as repeated `push`.
    pub fn concat(&self, items: &[Value]) -> Result<(), ArrayError> {
        for v in items {
            self.push(v.clone())?;
        }
        Ok(())
    }

    /// spec §4.D `pop`: remove the last element, shrinking the heap buffer if it has
    /// become mostly slack. `nil` on empty, never an error, except for frozen.
    pub fn pop(&self) -> Result<Value, ArrayError> {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        let mut st = self.storage.borrow_mut();
        let removed = pop_back(&mut st).unwrap_or(Value::Nil);
        if let Storage::Owned(vec) = &mut *st {
            let len = vec.len();
            let capa = vec.capacity();
            if capa > DEFAULT_CAPACITY && len < capa / 3 {
                let target = (2 * len).max(DEFAULT_CAPACITY);
                let mut shrunk = Vec::with_capacity(target);
                shrunk.append(vec);
                *vec = shrunk;
            }
        }
        st.make_embedded_if_possible();
        drop(st);
        self.bump_generation();
        Ok(removed)
    }

    /// spec §4.D `shift`/`behead`: remove the first element. Small arrays memmove the
    /// tail down; large, non-shared arrays promote to a shared root and advance the
    /// view instead of shifting every remaining element (amortized O(1) for the queue
    /// pattern of spec §8 scenario 1).
    pub fn shift(&self) -> Result<Value, ArrayError> {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        let mut st = self.storage.borrow_mut();
        let removed = shift_front(&mut st, SHIFT_PROMOTE_THRESHOLD).unwrap_or(Value::Nil);
        drop(st);
        self.bump_generation();
        Ok(removed)
    }

    /// spec §4.D `unshift`, with the §4.C.5 "room for unshift" fast path attempted
    /// first.
    pub fn unshift(&self, items: &[Value]) -> Result<(), ArrayError> {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        if items.is_empty() {
            return Ok(());
        }
        {
            let mut st = self.storage.borrow_mut();
            if st.is_shared() {
                if try_unshift_in_place(&mut st, items) {
                    drop(st);
                    self.bump_generation();
                    return Ok(());
                }
                cancel_sharing(&mut st);
            }
        }
        let mut st = self.storage.borrow_mut();
        let old_len = st.len();
        let new_len = old_len + items.len();
        if new_len > MAX_LEN {
            return Err(ArrayError::SizeLimitExceeded {
                requested: new_len,
                max: MAX_LEN,
            });
        }
        if new_len > st.capacity() {
            st.resize_capacity(new_len)?;
        }
        match &mut *st {
            Storage::Embedded { buf, len } => {
                for i in (0..old_len).rev() {
                    buf[i + items.len()] = buf[i].take();
                }
                for (i, v) in items.iter().enumerate() {
                    buf[i] = Some(v.clone());
                }
                *len = new_len as u8;
            }
            Storage::Owned(vec) => {
                vec.splice(0..0, items.iter().cloned());
            }
            Storage::Shared { .. } => unreachable!("cancel_sharing ran above"),
        }
        drop(st);
        self.bump_generation();
        Ok(())
    }

    /// spec §4.D `splice(beg, del_len, src, src_len)`: general insert/remove/replace.
    /// Pads with `nil` if `beg` is past the current length. Returns the removed
    /// elements.
    pub fn splice(&self, beg: i64, del_len: usize, src: &[Value]) -> Result<Vec<Value>, ArrayError> {
        self.modify()?;
        let mut st = self.storage.borrow_mut();
        let beg = self.resolve_index(beg);
        if beg < 0 {
            return Err(ArrayError::IndexOutOfRange {
                index: beg,
                len: st.len(),
            });
        }
        let beg = beg as usize;
        let mut all = st.to_vec();
        if beg > all.len() {
            all.resize(beg, Value::Nil);
        }
        let del_end = (beg + del_len).min(all.len());
        let removed: Vec<Value> = all[beg..del_end].to_vec();
        let total_new = all.len() - (del_end - beg) + src.len();
        if total_new > MAX_LEN {
            return Err(ArrayError::SizeLimitExceeded {
                requested: total_new,
                max: MAX_LEN,
            });
        }
        all.splice(beg..del_end, src.iter().cloned());
        *st = Storage::from_vec(all);
        drop(st);
        self.bump_generation();
        Ok(removed)
    }

    /// spec §4.D `resize(n)`: extend with `nil` or truncate; re-embeds/shrinks on
    /// truncation when it would free up wasted capacity.
    pub fn resize(&self, n: i64) -> Result<(), ArrayError> {
        if n < 0 {
            return Err(ArrayError::NegativeSize { requested: n });
        }
        let n = n as usize;
        if n > MAX_LEN {
            return Err(ArrayError::SizeLimitExceeded {
                requested: n,
                max: MAX_LEN,
            });
        }
        self.modify()?;
        let mut st = self.storage.borrow_mut();
        let cur = st.len();
        if n > cur {
            if n > st.capacity() {
                st.resize_capacity(n)?;
            }
            match &mut *st {
                Storage::Embedded { buf, len } => {
                    for slot in buf.iter_mut().take(n).skip(cur) {
                        *slot = Some(Value::Nil);
                    }
                    *len = n as u8;
                }
                Storage::Owned(vec) => vec.resize(n, Value::Nil),
                Storage::Shared { .. } => unreachable!("modify() cancelled sharing above"),
            }
        } else if n < cur {
            match &mut *st {
                Storage::Embedded { buf, len } => {
                    for slot in buf.iter_mut().skip(n).take(cur - n) {
                        *slot = None;
                    }
                    *len = n as u8;
                }
                Storage::Owned(vec) => vec.truncate(n),
                Storage::Shared { .. } => unreachable!("modify() cancelled sharing above"),
            }
            st.make_embedded_if_possible();
            st.shrink_to_len();
        }
        drop(st);
        self.bump_generation();
        Ok(())
    }

    /// spec §4.D `clear`: empties the array. Drops whatever buffer/root was held
    /// (including, for a `Shared` view, decref-ing the root via the ordinary `Rc`
    /// drop), landing back in the empty embedded state (spec: "if shared, detach and
    /// become an empty embedded array").
    pub fn clear(&self) -> Result<(), ArrayError> {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        *self.storage.borrow_mut() = Storage::empty_embedded();
        self.bump_generation();
        Ok(())
    }

    /// spec §4.D `replace(src)`: reset storage, then deep-copy `src` into the smallest
    /// representation that fits, or share its buffer if `src` is already large.
    pub fn replace(&self, src: &RArray) -> Result<(), ArrayError> {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        let new_storage = if src.len() <= EMBED_CAP {
            Storage::from_vec(src.to_vec())
        } else {
            let mut src_st = src.storage.borrow_mut();
            if src_st.is_embedded() {
                Storage::Owned(src_st.to_vec())
            } else {
                let root = promote_to_shared_root(&mut src_st);
                let len = src_st.len();
                Storage::Shared { root, start: 0, len }
            }
        };
        *self.storage.borrow_mut() = new_storage;
        self.bump_generation();
        Ok(())
    }

    /// spec §4.D "Reverse in place": two-pointer swap within the buffer.
    pub fn reverse(&self) -> Result<(), ArrayError> {
        self.modify()?;
        let mut st = self.storage.borrow_mut();
        match &mut *st {
            Storage::Embedded { buf, len } => buf[..*len as usize].reverse(),
            Storage::Owned(v) => v.reverse(),
            Storage::Shared { .. } => unreachable!("modify() cancelled sharing above"),
        }
        drop(st);
        self.bump_generation();
        Ok(())
    }

    /// spec §4.D "Rotate in place by `k`": normalizes `k` modulo `len` (negative counts
    /// from the right) and rotates without allocation. `slice::rotate_left` is std's
    /// own implementation of the spec's "reverse-trick" three-way rotation, so this
    /// delegates to it rather than re-deriving the same algorithm by hand.
    pub fn rotate(&self, k: i64) -> Result<(), ArrayError> {
        self.modify()?;
        let mut st = self.storage.borrow_mut();
        let len = st.len();
        if len == 0 {
            return Ok(());
        }
        let k = k.rem_euclid(len as i64) as usize;
        if k == 0 {
            return Ok(());
        }
        match &mut *st {
            Storage::Embedded { buf, len } => buf[..*len as usize].rotate_left(k),
            Storage::Owned(v) => v.rotate_left(k),
            Storage::Shared { .. } => unreachable!("modify() cancelled sharing above"),
        }
        drop(st);
        self.bump_generation();
        Ok(())
    }

    /// spec §4.D "Sort in place": sorts a private snapshot so a reentrant comparator
    /// (one that mutates, freezes, or replaces the receiver) cannot corrupt the live
    /// buffer mid-sort. After sorting, re-validates: if the receiver was frozen by the
    /// comparator, the sorted snapshot is discarded and a `FrozenWrite` error is
    /// raised, leaving the original (possibly reordered by nothing, since we never
    /// wrote back) elements in place — spec §8 scenario 4.
    pub fn sort_by<F>(&self, mut cmp: F) -> Result<(), ArrayError>
    where
        F: FnMut(&Value, &Value) -> Result<Ordering, ArrayError>,
    {
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        let mut snapshot = self.to_vec();
        let gen_before = self.generation.get();
        let mut cmp_err: Option<ArrayError> = None;
        snapshot.sort_by(|a, b| {
            if cmp_err.is_some() {
                return Ordering::Equal;
            }
            match cmp(a, b) {
                Ok(o) => o,
                Err(e) => {
                    cmp_err = Some(e);
                    Ordering::Equal
                }
            }
        });
        if let Some(e) = cmp_err {
            return Err(e);
        }
        if self.header.is_frozen() {
            return Err(ArrayError::FrozenWrite);
        }
        if self.generation.get() != gen_before {
            return Err(ArrayError::Reentrancy { op: "sort" });
        }
        let mut st = self.storage.borrow_mut();
        if st.is_shared() {
            cancel_sharing(&mut st);
        }
        *st = Storage::from_vec(snapshot);
        drop(st);
        self.bump_generation();
        Ok(())
    }

    /// `sort` using the element type's own `<=>`; a `None` comparison aborts with
    /// `ComparisonFailure` (spec §7).
    pub fn sort(&self) -> Result<(), ArrayError> {
        self.sort_by(|a, b| {
            a.element_cmp(b).ok_or_else(|| ArrayError::ComparisonFailure {
                message: "elements are not comparable".to_string(),
            })
        })
    }

    /// spec §4.D "Uniq in place" with no block: dedups by `eql?`/`hash`. Returns
    /// whether anything changed (Ruby's `uniq!` reports `nil`/no-change semantics).
    pub fn uniq(&self) -> Result<bool, ArrayError> {
        self.uniq_by(|v| v.clone())
    }

    /// `uniq` keyed by a block's return value instead of the element itself.
    pub fn uniq_by<F>(&self, mut key_fn: F) -> Result<bool, ArrayError>
    where
        F: FnMut(&Value) -> Value,
    {
        self.modify()?;
        let items = self.to_vec();
        if items.len() <= 1 {
            return Ok(false);
        }
        let mut seen = crate::algo::hash_eq::new_hash_set();
        let mut out = Vec::with_capacity(items.len());
        for v in items.iter() {
            let key = key_fn(v);
            if seen.insert(crate::algo::hash_eq::HashKey(key)) {
                out.push(v.clone());
            }
        }
        if out.len() == items.len() {
            return Ok(false);
        }
        let mut st = self.storage.borrow_mut();
        *st = Storage::from_vec(out);
        drop(st);
        self.bump_generation();
        Ok(true)
    }

    /// spec §4.D "Compact in place": sweeps `nil` elements out.
    pub fn compact(&self) -> Result<bool, ArrayError> {
        self.modify()?;
        let items = self.to_vec();
        let filtered: Vec<Value> = items.iter().filter(|v| !v.is_nil()).cloned().collect();
        if filtered.len() == items.len() {
            return Ok(false);
        }
        let mut st = self.storage.borrow_mut();
        *st = Storage::from_vec(filtered);
        drop(st);
        self.bump_generation();
        Ok(true)
    }

    /// spec §4.D "Flatten": recursive flattening to `depth` (`None` or negative is
    /// unbounded), using an explicit (items, resume-index, remaining-depth) stack
    /// rather than call-stack recursion, so depth is limited only by memory. When
    /// `depth` is unbounded, cycle detection uses an identity-keyed stack of the
    /// arrays currently being visited. Non-mutating: returns a new array.
    pub fn flatten(&self, depth: Option<i64>) -> Result<RArray, ArrayError> {
        let unbounded = depth.is_none() || depth.map(|d| d < 0).unwrap_or(false);
        let start_depth = depth.unwrap_or(-1);
        let mut out = Vec::new();
        let mut stack: Vec<(Vec<Value>, usize, i64)> = vec![(self.to_vec(), 0, start_depth)];
        let mut on_stack: Vec<*const RArray> = vec![self as *const RArray];

        loop {
            let mut frame_done = false;
            let mut descend: Option<(Vec<Value>, i64, *const RArray)> = None;
            let mut cycle = false;
            {
                let top = match stack.last_mut() {
                    Some(t) => t,
                    None => break,
                };
                if top.1 >= top.0.len() {
                    frame_done = true;
                } else {
                    let v = top.0[top.1].clone();
                    top.1 += 1;
                    match v {
                        Value::Array(handle) if top.2 != 0 => {
                            let ptr = Rc::as_ptr(&handle.0);
                            if unbounded && on_stack.contains(&ptr) {
                                cycle = true;
                            } else {
                                let next_rem = if top.2 > 0 { top.2 - 1 } else { top.2 };
                                descend = Some((handle.0.to_vec(), next_rem, ptr));
                            }
                        }
                        other => out.push(other),
                    }
                }
            }
            if cycle {
                return Err(ArrayError::Cycle);
            }
            if frame_done {
                stack.pop();
                on_stack.pop();
                continue;
            }
            if let Some((items, rem, ptr)) = descend {
                on_stack.push(ptr);
                stack.push((items, 0, rem));
            }
        }
        Ok(RArray::from_vec(out))
    }

    /// spec §3.4 "`a.dup`": fresh identity, element-wise copy.
    pub fn dup(&self) -> RArray {
        RArray::from_vec(self.to_vec())
    }

    /// spec §4.C.3 "Creating a view": expose `[offset, offset+len)` as a new array,
    /// copied inline if small, shared otherwise. Returns `None` ("nil") when `offset`
    /// is out of range, matching `a.slice(a.size + 1, 0) == nil` (spec §8); `offset ==
    /// len` is in range and yields an empty array.
    pub fn slice(&self, offset: i64, len: i64) -> Result<Option<RArray>, ArrayError> {
        if len < 0 {
            return Err(ArrayError::NegativeSize { requested: len });
        }
        let cur_len = self.len() as i64;
        let offset = self.resolve_index(offset);
        if offset < 0 || offset > cur_len {
            return Ok(None);
        }
        let len = len.min(cur_len - offset) as usize;
        let mut st = self.storage.borrow_mut();
        let view = create_view(&mut st, offset as usize, len);
        Ok(Some(RArray {
            header: Header::default(),
            storage: RefCell::new(view),
            generation: Cell::new(0),
        }))
    }

    /// spec §4.C.6 snapshot predicate.
    pub fn shares_storage_with(&self, other: &RArray) -> bool {
        shares_storage_with(&*self.storage.borrow(), &*other.storage.borrow())
    }

    /// spec §6 "fetch-by-index primitive": `(value, next_index)` or end-of-sequence.
    /// Reentrancy-safe replacement for a raw pointer loop — the caller always re-reads
    /// `len` through this method rather than caching a pointer across a callback.
    pub fn fetch(&self, idx: usize) -> Option<(Value, usize)> {
        if idx >= self.len() {
            return None;
        }
        Some((self.at(idx as i64), idx + 1))
    }

    /// Direct index swap, used by `algo::shuffle`'s in-place variant. Caller must have
    /// already run `modify()` (or otherwise ensured non-`Shared`, non-frozen storage).
    pub(crate) fn swap_indices(&self, i: usize, j: usize) -> Result<(), ArrayError> {
        if i == j {
            return Ok(());
        }
        let mut st = self.storage.borrow_mut();
        match &mut *st {
            Storage::Embedded { buf, .. } => buf.swap(i, j),
            Storage::Owned(v) => v.swap(i, j),
            Storage::Shared { .. } => unreachable!("caller must cancel sharing before swapping"),
        }
        drop(st);
        self.bump_generation();
        Ok(())
    }

    /// Run `modify()` and expose the post-cancel generation, for callers (e.g.
    /// `algo::shuffle::shuffle_in_place`) that need to detach before a sequence of
    /// direct index writes.
    pub(crate) fn modify_for_external_mutation(&self) -> Result<(), ArrayError> {
        self.modify()
    }

    /// Materialise the full logical contents as an owned `Vec` (a private snapshot).
    pub fn to_vec(&self) -> Vec<Value> {
        self.storage.borrow().to_vec()
    }

    pub(crate) fn element_eq_array(&self, other: &RArray) -> bool {
        array_eq(self, other)
    }

    pub(crate) fn element_eql_array(&self, other: &RArray) -> bool {
        array_eql(self, other)
    }

    pub(crate) fn element_hash_array(&self, hasher: &mut dyn std::hash::Hasher) {
        array_hash_into(self, hasher)
    }
}

impl Default for RArray {
    fn default() -> Self {
        RArray::new()
    }
}

impl fmt::Debug for RArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

impl PartialEq for RArray {
    fn eq(&self, other: &Self) -> bool {
        array_eq(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(xs: &[i64]) -> Vec<Value> {
        xs.iter().map(|&x| Value::Int(x)).collect()
    }

    #[test]
    fn push_pop_round_trip() {
        let a = RArray::new();
        a.push(Value::Int(1)).unwrap();
        a.push(Value::Int(2)).unwrap();
        let popped = a.pop().unwrap();
        assert_eq!(popped, Value::Int(2));
        assert_eq!(a.to_vec(), ints(&[1]));
    }

    #[test]
    fn pop_on_empty_is_nil() {
        let a = RArray::new();
        assert_eq!(a.pop().unwrap(), Value::Nil);
    }

    #[test]
    fn at_boundary_returns_nil_not_error() {
        let a = RArray::from_vec(ints(&[1, 2, 3]));
        assert_eq!(a.at(3), Value::Nil);
        assert_eq!(a.at(-3), Value::Int(1));
        assert_eq!(a.at(-4), Value::Nil);
    }

    #[test]
    fn queue_pattern_stays_small() {
        let a = RArray::new();
        for i in 0..10_000i64 {
            a.push(Value::Int(i)).unwrap();
            a.shift().unwrap();
        }
        assert!(a.is_empty());
        assert!(a.capacity() < 200);
    }

    #[test]
    fn slice_and_modify_detaches() {
        let a = RArray::from_vec(ints(&[1, 2, 3, 4, 5]));
        let b = a.slice(1, 3).unwrap().unwrap();
        assert_eq!(b.to_vec(), ints(&[2, 3, 4]));
        a.store(0, Value::Int(99)).unwrap();
        assert_eq!(a.to_vec(), ints(&[99, 2, 3, 4, 5]));
        assert_eq!(b.to_vec(), ints(&[2, 3, 4]));
    }

    #[test]
    fn slice_out_of_range_is_nil() {
        let a = RArray::from_vec(ints(&[1, 2, 3, 4, 5]));
        assert!(a.slice(5, 0).unwrap().unwrap().is_empty());
        assert!(a.slice(6, 0).unwrap().is_none());
    }

    #[test]
    fn rotate_round_trips() {
        let a = RArray::from_vec(ints(&[1, 2, 3, 4, 5]));
        a.rotate(2).unwrap();
        a.rotate(-2).unwrap();
        assert_eq!(a.to_vec(), ints(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn reverse_round_trips() {
        let a = RArray::from_vec(ints(&[1, 2, 3]));
        a.reverse().unwrap();
        a.reverse().unwrap();
        assert_eq!(a.to_vec(), ints(&[1, 2, 3]));
    }

    #[test]
    fn frozen_write_is_rejected() {
        let a = RArray::from_vec(ints(&[1, 2, 3]));
        a.freeze();
        assert_eq!(a.push(Value::Int(4)), Err(ArrayError::FrozenWrite));
        assert_eq!(a.to_vec(), ints(&[1, 2, 3]));
    }

    #[test]
    fn sort_reentrant_freeze_fails_and_preserves_elements() {
        let a = RArray::from_vec(ints(&[3, 1, 2]));
        let frozen_inside = std::cell::Cell::new(false);
        let result = a.sort_by(|x, y| {
            if !frozen_inside.get() {
                a.freeze();
                frozen_inside.set(true);
            }
            Ok(x.element_cmp(y).unwrap())
        });
        assert_eq!(result, Err(ArrayError::FrozenWrite));
        let mut v: Vec<i64> = a
            .to_vec()
            .into_iter()
            .map(|v| match v {
                Value::Int(i) => i,
                _ => unreachable!(),
            })
            .collect();
        v.sort();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn flatten_with_cycle_errors_and_leaves_array_intact() {
        let cyclic = Rc::new(RArray::from_vec(ints(&[1, 2])));
        let self_ref = Value::Array(crate::enums::value::ArrayHandle(cyclic.clone()));
        cyclic.push(self_ref).unwrap();
        let err = cyclic.flatten(None);
        assert_eq!(err, Err(ArrayError::Cycle));
        assert_eq!(cyclic.len(), 3);
    }

    #[test]
    fn uniq_idempotent() {
        let a = RArray::from_vec(ints(&[1, 1, 2, 3, 3, 3]));
        a.uniq().unwrap();
        assert_eq!(a.to_vec(), ints(&[1, 2, 3]));
        let changed = a.uniq().unwrap();
        assert!(!changed);
    }

    #[test]
    fn compact_idempotent() {
        let a = RArray::from_vec(vec![Value::Int(1), Value::Nil, Value::Int(2), Value::Nil]);
        a.compact().unwrap();
        assert_eq!(a.to_vec(), ints(&[1, 2]));
        let changed = a.compact().unwrap();
        assert!(!changed);
    }

    #[test]
    fn dup_is_equal_but_distinct() {
        let a = RArray::from_vec(ints(&[1, 2, 3]));
        let b = a.dup();
        assert_eq!(a, b);
        assert!(!std::ptr::eq(&a, &b));
    }
}
