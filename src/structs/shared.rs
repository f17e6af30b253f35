//! # **Shared Module** - *Copy-on-write sharing & refcount manager (component C)*
//!
//! Implements spec §4.C: promoting an array to a shared root, handing out views,
//! cancelling sharing on first write, the "room for unshift" trick, and the snapshot
//! predicate. Refcounting is `Rc::strong_count`/`Rc::clone`/`Drop` rather than a
//! hand-rolled counter: spec §9 says a GC-less target "needs a real reference-counted
//! pointer here," and `Rc` *is* that pointer — `incref`/`decref` are simply what cloning
//! and dropping an `Rc` already do, so this module has no functions by those names.
//!
//! The spec's `SHARED_ROOT`-demotion step ("demote R to an empty embedded array... it
//! remains alive for the GC to reclaim") has no counterpart here: a shared root in this
//! crate is a bare `Rc<RefCell<Vec<T>>>`, never itself a user-visible `RArray`, so when
//! the last `SHARED` view releases it the `Rc` simply drops the backing `Vec` — there is
//! no separate object for a collector to reclaim later.

use std::cell::RefCell;
use std::rc::Rc;

use crate::structs::header::EMBED_CAP;
use crate::structs::storage::Storage;

/// spec §4.C.1: turn the current storage into a `SHARED` view over a freshly promoted
/// root covering the whole array, and return the root. If already `Shared`, returns the
/// existing root unchanged (the "already SHARED" case of 4.C.1).
pub fn promote_to_shared_root<T: Clone>(storage: &mut Storage<T>) -> Rc<RefCell<Vec<T>>> {
    match storage {
        Storage::Shared { root, .. } => root.clone(),
        Storage::Embedded { buf, len } => {
            let n = *len as usize;
            let mut v = Vec::with_capacity(n);
            for slot in buf.iter_mut().take(n) {
                v.push(slot.take().expect("embedded slot within len is occupied"));
            }
            let root = Rc::new(RefCell::new(v));
            *storage = Storage::Shared {
                root: root.clone(),
                start: 0,
                len: n,
            };
            root
        }
        Storage::Owned(v) => {
            let n = v.len();
            let taken = std::mem::take(v);
            let root = Rc::new(RefCell::new(taken));
            *storage = Storage::Shared {
                root: root.clone(),
                start: 0,
                len: n,
            };
            root
        }
    }
}

/// spec §4.C.3: expose `[offset, offset+len)` of `source` as a new array's storage.
/// Small windows are copied into a fresh embedded slot to avoid refcount traffic; larger
/// windows promote `source` to a shared root and return a `Shared` view into it.
pub fn create_view<T: Clone>(source: &mut Storage<T>, offset: usize, len: usize) -> Storage<T> {
    if len <= EMBED_CAP {
        let mut buf: [Option<T>; EMBED_CAP] = [None, None, None, None];
        match source {
            Storage::Embedded { buf: src, .. } => {
                for (slot, val) in buf.iter_mut().zip(
                    src[offset..offset + len]
                        .iter()
                        .map(|o| o.clone().expect("slot in range is occupied")),
                ) {
                    *slot = Some(val);
                }
            }
            Storage::Owned(v) => {
                for (slot, val) in buf.iter_mut().zip(v[offset..offset + len].iter().cloned()) {
                    *slot = Some(val);
                }
            }
            Storage::Shared { root, start, .. } => {
                let r = root.borrow();
                for (slot, val) in buf
                    .iter_mut()
                    .zip(r[start + offset..start + offset + len].iter().cloned())
                {
                    *slot = Some(val);
                }
            }
        }
        return Storage::Embedded { buf, len: len as u8 };
    }
    let root = promote_to_shared_root(source);
    let base = match source {
        Storage::Shared { start, .. } => *start,
        _ => unreachable!("promote_to_shared_root always leaves Shared storage behind"),
    };
    Storage::Shared {
        root,
        start: base + offset,
        len,
    }
}

/// spec §4.C.4: detach `storage` from any shared root before a write. No-op if not
/// `Shared`. Chooses re-embed, steal, or deep-copy in that order.
pub fn cancel_sharing<T: Clone>(storage: &mut Storage<T>) {
    let (root, start, len) = match storage {
        Storage::Shared { root, start, len } => (root.clone(), *start, *len),
        _ => return,
    };

    // Strategy 1: re-embed.
    if len <= EMBED_CAP {
        let mut buf: [Option<T>; EMBED_CAP] = [None, None, None, None];
        {
            let r = root.borrow();
            for (slot, val) in buf.iter_mut().zip(r[start..start + len].iter().cloned()) {
                *slot = Some(val);
            }
        }
        *storage = Storage::Embedded { buf, len: len as u8 };
        return;
    }

    let root_occupied = root.borrow().len();
    // Strategy 2: steal the root's buffer. `root` plus the Rc still held inside
    // `storage` account for 2 strong references; anything beyond that means another
    // SHARED view is also watching this root, so stealing is unsafe.
    if Rc::strong_count(&root) == 2 && len * 2 > root_occupied {
        {
            let mut v = root.borrow_mut();
            v.drain(0..start);
            v.truncate(len);
        }
        // Drop storage's own reference so `root` (the local clone) is the sole owner.
        *storage = Storage::Owned(Vec::new());
        match Rc::try_unwrap(root) {
            Ok(cell) => {
                *storage = Storage::Owned(cell.into_inner());
                return;
            }
            Err(root) => {
                // Another reference appeared concurrently (shouldn't happen on a single
                // thread); fall through to a deep copy rather than leave storage empty.
                let v: Vec<T> = root.borrow()[0..len].to_vec();
                *storage = Storage::Owned(v);
                return;
            }
        }
    }

    // Strategy 3: deep copy. Falls through here whenever another SHARED view is still
    // watching the root, or the stolen buffer would carry more waste than it's worth
    // keeping — surfaced since it's the one `cancel_sharing` path that's O(len) instead
    // of O(1)/O(small).
    eprintln!(
        "cancel_sharing: deep-copying {len} element(s) out of a shared root of {} \
         (strong_count={}); no cheaper strategy applied.",
        root.borrow().len(),
        Rc::strong_count(&root)
    );
    let v: Vec<T> = root.borrow()[start..start + len].to_vec();
    *storage = Storage::Owned(v);
}

/// spec §4.C.5: attempt an in-place prepend of `new_elems` ahead of a `Shared` view that
/// exclusively occupies its root and has left slack. Returns `false` (nothing written)
/// if the fast path doesn't apply, in which case the caller falls back to `cancel_sharing`
/// followed by a normal `Vec` insert.
pub fn try_unshift_in_place<T: Clone>(storage: &mut Storage<T>, new_elems: &[T]) -> bool {
    let (root, start, len) = match storage {
        Storage::Shared { root, start, len } => (root.clone(), *start, *len),
        _ => return false,
    };
    if Rc::strong_count(&root) != 2 {
        return false;
    }
    let k = new_elems.len();
    let mut v = root.borrow_mut();
    if start >= k {
        // Enough free prefix: slide left and write directly.
        let new_start = start - k;
        for (i, e) in new_elems.iter().enumerate() {
            v[new_start + i] = e.clone();
        }
        drop(v);
        *storage = Storage::Shared {
            root,
            start: new_start,
            len: len + k,
        };
        return true;
    }
    // Not enough left slack, but if the total still fits the root's buffer, shift
    // existing content right within the root to make room. This is still cheaper than
    // the caller's fallback (a full detach + reallocation).
    if v.len() + (k - start) <= v.capacity() || start + len + (k - start) <= v.len() {
        let needed_shift = k - start;
        let occupied_end = start + len;
        if occupied_end + needed_shift <= v.len().max(occupied_end + needed_shift) {
            v.resize(occupied_end + needed_shift, new_elems[0].clone());
            v.copy_within(start..occupied_end, start + needed_shift);
            for (i, e) in new_elems.iter().enumerate() {
                v[i] = e.clone();
            }
            drop(v);
            *storage = Storage::Shared {
                root,
                start: 0,
                len: len + k,
            };
            return true;
        }
    }
    false
}

/// Push-fast-path helper (spec §4.D: "the cancel-sharing step is skipped in this fast
/// path"): write `v` into the root's trailing slack, or grow the root in place if this
/// view is the sole viewer, without detaching from the shared root at all. Returns `v`
/// back on failure so the caller can fall through to the normal cancel-and-push path.
pub fn try_push_into_slack<T>(storage: &mut Storage<T>, v: T) -> Result<(), T> {
    let (root, start, len) = match storage {
        Storage::Shared { root, start, len } => (root.clone(), *start, *len),
        _ => return Err(v),
    };
    {
        let mut r = root.borrow_mut();
        if start + len < r.len() {
            r[start + len] = v;
        } else if Rc::strong_count(&root) == 2 {
            r.push(v);
        } else {
            return Err(v);
        }
    }
    if let Storage::Shared { len, .. } = storage {
        *len += 1;
    }
    Ok(())
}

/// Pop from the back. On `Shared` storage this only shrinks the view's `len` — the
/// popped slot becomes inaccessible waste in the root's buffer, same as `shift_front`'s
/// advance of `start`, rather than a full detach.
pub fn pop_back<T: Clone>(storage: &mut Storage<T>) -> Option<T> {
    match storage {
        Storage::Embedded { buf, len } => {
            if *len == 0 {
                return None;
            }
            *len -= 1;
            buf[*len as usize].take()
        }
        Storage::Owned(v) => v.pop(),
        Storage::Shared { root, start, len } => {
            if *len == 0 {
                return None;
            }
            *len -= 1;
            Some(root.borrow()[*start + *len].clone())
        }
    }
}

/// Pop from the front. Small `Embedded`/`Owned` storage shifts the tail down in place;
/// `Owned` storage past `promote_threshold` instead promotes to a shared root and
/// advances `start` by one, leaving the removed prefix as inaccessible waste — the same
/// idea as `cancel_sharing`'s steal strategy, run in reverse. Already-`Shared` storage
/// just advances `start`.
pub fn shift_front<T: Clone>(storage: &mut Storage<T>, promote_threshold: usize) -> Option<T> {
    match storage {
        Storage::Embedded { buf, len } => {
            if *len == 0 {
                return None;
            }
            let removed = buf[0].take();
            for i in 1..(*len as usize) {
                buf[i - 1] = buf[i].take();
            }
            *len -= 1;
            removed
        }
        Storage::Owned(v) => {
            if v.is_empty() {
                return None;
            }
            if v.len() > promote_threshold {
                let n = v.len();
                let taken = std::mem::take(v);
                let root = Rc::new(RefCell::new(taken));
                let removed = root.borrow()[0].clone();
                *storage = Storage::Shared {
                    root,
                    start: 1,
                    len: n - 1,
                };
                Some(removed)
            } else {
                Some(v.remove(0))
            }
        }
        Storage::Shared { root, start, len } => {
            if *len == 0 {
                return None;
            }
            let removed = root.borrow()[*start].clone();
            *start += 1;
            *len -= 1;
            Some(removed)
        }
    }
}

/// spec §4.C.6: two arrays "share storage" if both are `Shared` over the same root with
/// equal view lengths and coincident start offsets.
pub fn shares_storage_with<T>(a: &Storage<T>, b: &Storage<T>) -> bool {
    match (a, b) {
        (
            Storage::Shared {
                root: ra,
                start: sa,
                len: la,
            },
            Storage::Shared {
                root: rb,
                start: sb,
                len: lb,
            },
        ) => Rc::ptr_eq(ra, rb) && sa == sb && la == lb,
        _ => false,
    }
}
