//! # **RNG Source** - *The randomness collaborator for `sample`/`shuffle`*
//!
//! Per spec §6 ("From the RNG"): a uniform-integer-below primitive, plus a way to select
//! among named RNG sources. `rand` is this crate's one non-optional, non-teacher-derived
//! dependency (see `SPEC_FULL.md`'s "Dependency added" section for why).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform-integer-below primitive required by `sample`/`shuffle`.
pub trait RngSource {
    /// Returns a uniform value in `[0, bound)`. `bound` must be nonzero.
    fn below(&mut self, bound: usize) -> usize;
}

/// Named RNG sources a caller may select between, mirroring the spec's "select among
/// named RNG sources" requirement.
#[derive(Debug, Clone, Copy)]
pub enum RngChoice {
    /// Seeded from OS entropy, reseeded each time it's constructed.
    FromEntropy,
    /// Fixed seed, for reproducible sampling/shuffling in tests.
    Seeded(u64),
}

/// Default [`RngSource`] implementation, backed by `rand::rngs::StdRng`.
pub struct DefaultRng {
    inner: StdRng,
}

impl DefaultRng {
    pub fn new(choice: RngChoice) -> Self {
        let inner = match choice {
            RngChoice::FromEntropy => StdRng::from_entropy(),
            RngChoice::Seeded(seed) => StdRng::seed_from_u64(seed),
        };
        Self { inner }
    }
}

impl Default for DefaultRng {
    fn default() -> Self {
        Self::new(RngChoice::FromEntropy)
    }
}

impl RngSource for DefaultRng {
    fn below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "RngSource::below: bound must be nonzero");
        self.inner.gen_range(0..bound)
    }
}
