//! # **GC Hooks** - *The garbage collector as an external collaborator*
//!
//! Per spec §6 ("From the garbage collector") and §9 ("Write barriers"): the storage
//! engine is written against a generational, precise collector that owns shared roots
//! and must be notified of cross-array pointer stores. This crate does not ship a
//! collector — the embedding host supplies one by implementing [`GcHooks`] — but every
//! call site that the spec requires a hook at still makes the call, through [`NullGc`]
//! by default, so a host can be plugged in without touching `structs/`.

/// Size-class hint passed to `new_object`, mirroring the spec's "object size in
/// embedded mode" query: the exact embedded capacity is a runtime policy decision
/// on a GC-managed host, not a fixed constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeClass(pub usize);

/// Collaboration points a precise, generational collector would need from the storage
/// engine. None of these are invoked by this crate's own allocation (`Vec`/`Rc` are used
/// directly per §9's "GC-less target" guidance) — they exist for a host that wants to
/// root shared buffers in its own collector.
pub trait GcHooks {
    /// Called when an array transitions into heap-owned mode, before the allocation.
    fn new_object(&self, _size_class: SizeClass) {}

    /// Called on every store of one managed element into another array's buffer
    /// (splice, replace, shared-root promotion), so a generational collector can
    /// record the inter-generational reference.
    fn write_barrier(&self, _from_generation: u64, _to_generation: u64) {}
}

/// No-op collector, used when no host collector is registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGc;

impl GcHooks for NullGc {}
