//! Owned PRNG for the cuckoo-path random walk.
//!
//! spec.md §9 (Design Notes) is explicit that insert order must be
//! deterministic under a given seed for testing, so the walker owns its PRNG
//! state instead of reaching for `rand::thread_rng()` — the same choice the
//! teacher crate makes in `filter::cuckoo::growable::tests` when it seeds a
//! `rand_xoshiro::Xoshiro256PlusPlus` for reproducible test fixtures.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// A small wrapper around the xoshiro generator used for kick-out slot
/// selection during cuckoo displacement.
pub struct CuckooRng(Xoshiro256PlusPlus);

impl CuckooRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    /// Picks a uniformly random slot in `[0, slots)`.
    pub fn random_slot(&mut self, slots: usize) -> usize {
        self.0.gen_range(0..slots)
    }
}

impl Default for CuckooRng {
    /// Not reproducible across runs; prefer `seed_from_u64` in tests.
    fn default() -> Self {
        Self(Xoshiro256PlusPlus::from_entropy())
    }
}
