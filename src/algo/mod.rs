//! # **Algorithmic Surface** - *Component E: thin algorithms built on A-D*
//!
//! Per spec §2: "Sort, rotate, reverse, uniq, flatten, set ops, sample,
//! permutation/combination visitors; all built on B-D". Rotate/reverse/sort/uniq/
//! flatten are mutation primitives close enough to the storage engine to live on
//! `RArray` itself (`structs/array.rs`); the remainder — whose interesting logic is
//! algorithmic rather than storage-layout-driven — lives here, one module per spec
//! §4.E bullet.

pub mod bsearch;
pub mod hash_eq;
pub mod join;
#[cfg(feature = "parallel_proc")]
pub mod parallel;
pub mod permute;
pub mod sample;
pub mod setops;
pub mod shuffle;
pub mod sum;
