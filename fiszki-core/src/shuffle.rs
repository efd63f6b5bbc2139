//! Deterministic shuffling of card collections.
//!
//! The ordering is a fixed permutation of indices determined solely by
//! `(seed, length)`, so "today's" study order survives reloads as long as
//! the same seed is used.

/// Seed used application-wide so the daily shuffle order is stable.
pub const DEFAULT_SEED: i64 = 1024;

/// Sine-fraction pseudo-random source.
///
/// Each draw advances an integer counter and returns the fractional part
/// of `sin(counter) * 10000`. Determinism holds within one runtime; a
/// platform whose libm rounds `sin` differently in the last bit may
/// produce a different sequence. Swap in an integer LCG if bit-exact
/// cross-platform reproducibility is ever needed.
#[derive(Debug, Clone)]
pub struct SeededRng {
    counter: i64,
}

impl SeededRng {
    pub fn new(seed: i64) -> Self {
        Self { counter: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.counter += 1;
        let x = (self.counter as f64).sin() * 10000.0;
        x - x.floor()
    }

    /// Uniform integer draw over the inclusive range `[min, max]`.
    pub fn pick(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        let span = (max - min + 1) as f64;
        min + (self.next() * span).floor() as u32
    }
}

/// Fisher-Yates over a copy of `items`, driven by [`SeededRng`].
/// The input is never mutated; an empty slice yields an empty vec.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: i64) -> Vec<T> {
    let mut out = items.to_vec();
    let mut rng = SeededRng::new(seed);
    let mut m = out.len();
    while m > 0 {
        let j = (rng.next() * m as f64).floor() as usize;
        m -= 1;
        out.swap(m, j);
    }
    out
}

/// Shuffle with [`DEFAULT_SEED`].
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    seeded_shuffle(items, DEFAULT_SEED)
}
