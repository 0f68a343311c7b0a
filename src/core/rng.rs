//! Deterministic die rolling with a forced-sequence override for tests.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical roll sequence
//! - **Forkable**: Create independent streams for simulations
//! - **Forceable**: Queue exact face values for the next roll only
//!
//! ## Forced rolls
//!
//! ```
//! use lange_strasse::core::DiceRng;
//!
//! let mut rng = DiceRng::new(42);
//! rng.force_next(&[1, 2, 3]);
//!
//! // The queued faces are consumed in order by the next roll...
//! assert_eq!(rng.roll_face(), 1);
//! assert_eq!(rng.roll_face(), 2);
//! assert_eq!(rng.roll_face(), 3);
//! rng.finish_roll();
//!
//! // ...after which rolling reverts to the seeded stream.
//! let face = rng.roll_face();
//! assert!((1..=6).contains(&face));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Deterministic face-value source for six-sided dice.
///
/// Uses ChaCha8 for speed while keeping cryptographic-quality streams.
/// A caller-supplied forced sequence (see [`DiceRng::force_next`]) is
/// consumed by exactly one roll, then the seeded stream resumes.
#[derive(Clone, Debug)]
pub struct DiceRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
    forced: VecDeque<u8>,
}

impl DiceRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
            forced: VecDeque::new(),
        }
    }

    /// Fork this RNG to create an independent stream.
    ///
    /// Each fork produces a different but deterministic sequence.
    /// The forced queue is not inherited by the fork.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
            forced: VecDeque::new(),
        }
    }

    /// Queue exact face values for the next roll of rollable dice.
    ///
    /// Out-of-range values are clamped into 1..=6. Shortfall relative to
    /// the number of dice rolled falls back to the seeded stream; excess
    /// values are discarded when the roll finishes.
    pub fn force_next(&mut self, faces: &[u8]) {
        self.forced = faces.iter().map(|&f| f.clamp(1, 6)).collect();
    }

    /// Whether a forced sequence is currently queued.
    #[must_use]
    pub fn has_forced(&self) -> bool {
        !self.forced.is_empty()
    }

    /// Produce one face value in 1..=6.
    ///
    /// Drains the forced queue first, then the seeded stream.
    pub fn roll_face(&mut self) -> u8 {
        match self.forced.pop_front() {
            Some(face) => face,
            None => self.inner.gen_range(1..=6),
        }
    }

    /// Mark the end of one roll: any unconsumed forced values are dropped
    /// so forcing never leaks past the roll it was queued for.
    pub fn finish_roll(&mut self) {
        self.forced.clear();
    }
}
