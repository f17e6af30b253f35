//! # **Error Module** - Custom *Dynarray* Error Type
//!
//! Defines the unified error type for the storage engine.
//!
//! ## Covers
//! - Out-of-range indices, size-limit violations, negative sizes,
//!   argument-type mismatches, frozen-write attempts, comparison
//!   failures, reentrancy/concurrent-modification, cycles, and
//!   allocation failure.
//! - Implements `Display` for readable output and `Error` for integration
//!   with standard Rust error handling.

use std::error::Error;
use std::fmt;

/// Catch-all error type for the storage engine.
///
/// Every fallible public operation returns `Result<T, ArrayError>`; nothing
/// is swallowed (propagation policy, spec §7).
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayError {
    /// Index too small (after negative resolution) or too large.
    IndexOutOfRange { index: i64, len: usize },
    /// Requested length or capacity would exceed `MAX_LEN`.
    SizeLimitExceeded { requested: usize, max: usize },
    /// Attempt to create or resize to a negative length.
    NegativeSize { requested: i64 },
    /// A value required to be array- or integer-convertible was not.
    ArgumentType {
        expected: &'static str,
        message: Option<String>,
    },
    /// Any mutation attempted on a frozen array.
    FrozenWrite,
    /// `<=>` returned `None` where an ordering was required, or a bsearch
    /// block returned an unexpected value.
    ComparisonFailure { message: String },
    /// Sort, shuffle, permute, product, flatten, or similar detected that
    /// their working structure was tampered with mid-operation.
    Reentrancy { op: &'static str },
    /// Recursive flatten or join encountered a self-reference under
    /// unbounded depth.
    Cycle,
    /// Surfaced from the allocator; the array is left unchanged.
    AllocationFailure,
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayError::IndexOutOfRange { index, len } => {
                write!(f, "index {} outside of array bounds: len {}", index, len)
            }
            ArrayError::SizeLimitExceeded { requested, max } => write!(
                f,
                "requested size {} exceeds the maximum of {}",
                requested, max
            ),
            ArrayError::NegativeSize { requested } => {
                write!(f, "negative size requested: {}", requested)
            }
            ArrayError::ArgumentType { expected, message } => {
                if let Some(msg) = message {
                    write!(f, "expected {}: {}", expected, msg)
                } else {
                    write!(f, "expected {}", expected)
                }
            }
            ArrayError::FrozenWrite => write!(f, "can't modify frozen array"),
            ArrayError::ComparisonFailure { message } => {
                write!(f, "comparison failed: {}", message)
            }
            ArrayError::Reentrancy { op } => {
                write!(f, "{}: array was modified during iteration", op)
            }
            ArrayError::Cycle => write!(f, "self-referential array detected"),
            ArrayError::AllocationFailure => write!(f, "allocation failure"),
        }
    }
}

impl Error for ArrayError {}
