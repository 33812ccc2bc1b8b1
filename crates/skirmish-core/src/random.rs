//! Injectable randomness.
//!
//! Matchmaking pairings, shop rolls and bot rosters draw through this
//! trait so a fixed seed reproduces a whole match in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random indices.
pub trait RandomSource: Send {
    /// A uniform index in `0..bound`. `bound` must be non-zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Fisher-Yates shuffle driven by a [`RandomSource`].
///
/// Kept as a free function so the trait stays object-safe.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}

/// Production source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&mut self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }
}

/// Deterministic source for tests and replays.
#[derive(Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}
