//! # **Custom Value Trait Module** - *Makes arbitrary types storable inside `Value::Custom`*
//!
//! Mirrors the §6 "From the element type" collaboration: the storage engine itself
//! never inspects element contents, but the default `Value` element type needs an escape
//! hatch for host-specific payloads (accumulators, sketches, engine-specific outputs)
//! that don't fit the closed `Nil/Bool/Int/Float/Str/Array` set.
//!
//! Single-threaded by design (§5: "the engine is designed for a single-threaded cooperative
//! runtime") — unlike the teacher's `Send + Sync` bound, this trait only requires `Any + Debug`,
//! and values are held behind `Rc` rather than `Arc`.

use std::any::Any;
use std::rc::Rc;

/// Trait for any object that can be stored in `Value::Custom`.
///
/// Manual implementation is not required: any `Debug + Clone + PartialEq + 'static` type
/// automatically satisfies this via the blanket impl below.
pub trait CustomValue: Any + std::fmt::Debug {
    /// Downcasts the type as `Any`.
    fn as_any(&self) -> &dyn Any;

    /// Returns a deep clone of the object.
    fn deep_clone(&self) -> Rc<dyn CustomValue>;

    /// Semantic equality on the boxed object; backs `PartialEq` for `Value`, since
    /// `dyn CustomValue` cannot use `==` directly.
    fn eq_box(&self, other: &dyn CustomValue) -> bool;
}

impl<T> CustomValue for T
where
    T: Any + Clone + PartialEq + std::fmt::Debug,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deep_clone(&self) -> Rc<dyn CustomValue> {
        Rc::new(self.clone())
    }

    fn eq_box(&self, other: &dyn CustomValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |o| self == o)
    }
}
