//! Seeded random source
//!
//! A string seed is folded into a 32-bit state (`h = h * 31 + unit`, over
//! UTF-16 code units, wrapping) which drives a mulberry32 generator. The
//! same seed yields the same stream on every platform.
//!
//! Candidate selection goes through [`shuffle`] only, never direct indexing,
//! so one plan consumes exactly one auditable stream.

use rand::distr::Alphanumeric;
use rand::Rng;

const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;
const GENERATED_SEED_LEN: usize = 16;

/// Deterministic generator of floats in `[0, 1)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator from a string seed
    #[must_use]
    pub fn new(seed: &str) -> Self {
        Self {
            state: hash_seed(seed),
        }
    }

    /// Next draw in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        f64::from(t ^ (t >> 14)) / TWO_POW_32
    }

    /// Uniform index in `0..bound`; `bound` must be non-zero
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn index_below(&mut self, bound: usize) -> usize {
        (self.next_f64() * bound as f64).floor() as usize
    }
}

/// Fold a seed string into the generator's initial state
#[must_use]
pub fn hash_seed(seed: &str) -> u32 {
    seed.encode_utf16()
        .fold(0u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// Fresh high-entropy seed for callers that did not supply one
#[must_use]
pub fn generate_seed() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SEED_LEN)
        .map(char::from)
        .collect()
}

/// Fisher-Yates shuffle from the last index down to 1
pub fn shuffle<T>(items: &mut [T], rng: &mut SeededRng) {
    for i in (1..items.len()).rev() {
        let j = rng.index_below(i + 1);
        items.swap(i, j);
    }
}
