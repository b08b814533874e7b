use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the jitter added to baseline estimates.
///
/// Injected so callers decide between real variance, a reproducible seed,
/// or a fixed value in tests.
pub trait RandomSource {
    /// Integer in `min..=max`. Implementations must not panic when `min > max`.
    fn jitter(&mut self, min: i32, max: i32) -> i32;
}

/// Thread-local RNG
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn jitter(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Reproducible sequence from a `--seed`
#[derive(Debug)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn jitter(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.0.gen_range(min..=max)
    }
}

/// Always returns the same value, clamped into the requested range
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRandom(pub i32);

impl RandomSource for FixedRandom {
    fn jitter(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.0.clamp(min, max)
    }
}
