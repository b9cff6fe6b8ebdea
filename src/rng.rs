//! The random service threaded through every randomized operation.
//!
//! Nothing in this crate touches a global generator: construction, selection and
//! local search all take an explicit `&mut R` where `R: RandomSource`, so a run is
//! reproducible from its seed and call sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform random draws needed by the heuristics.
pub trait RandomSource {
    /// Returns a uniform integer in `[0, n)`.
    ///
    /// # Panics
    /// Implementations may panic if `n == 0`.
    fn below(&mut self, n: usize) -> usize;

    /// Returns a uniform real in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn below(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }

    #[inline]
    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Creates the driver's generator from a seed.
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(splitmix64(seed))
}

/// Draws a fresh seed from the thread-local entropy source.
pub fn random_seed() -> u64 {
    rand::random::<u64>()
}

/// Fisher-Yates shuffle driven by a [`RandomSource`].
pub fn shuffle_slice<T, R: RandomSource + ?Sized>(rng: &mut R, slice: &mut [T]) {
    let n = slice.len();
    for i in (1..n).rev() {
        let j = rng.below(i + 1);
        slice.swap(i, j);
    }
}

/// SplitMix64 mixer for deriving well-spread seeds from small integers.
#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A [`RandomSource`] that replays a fixed script, for tests that need to pin
/// every tie-break.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct ScriptedRandom {
    picks: std::collections::VecDeque<usize>,
    units: std::collections::VecDeque<f64>,
}

#[cfg(test)]
impl ScriptedRandom {
    /// Integer draws are taken from `picks` in order (reduced modulo `n`);
    /// once exhausted every draw returns 0.
    pub(crate) fn with_picks(picks: &[usize]) -> Self {
        Self {
            picks: picks.iter().copied().collect(),
            units: std::collections::VecDeque::new(),
        }
    }

    pub(crate) fn remaining_picks(&self) -> usize {
        self.picks.len()
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "below(0) has no valid result");
        self.picks.pop_front().map_or(0, |p| p % n)
    }

    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
