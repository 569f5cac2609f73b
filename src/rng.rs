//! Seedable random source shared by the carver and the agent.
//!
//! Every random choice in the crate (candidate shuffling while carving,
//! epsilon-greedy exploration while training) draws from one [`WazeRng`].
//! ChaCha8 gives the same stream on every platform, so a seed pins down
//! both the maze layout and the whole training run.
//!
//! ```
//! use waze::rng::WazeRng;
//!
//! let mut a = WazeRng::new(7);
//! let mut b = WazeRng::new(7);
//! assert_eq!(a.gen_index(100), b.gen_index(100));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub struct WazeRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl WazeRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the thread-local entropy source.
    ///
    /// The drawn seed is kept so the run can be reproduced later.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().next_u64())
    }

    /// The seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..upper`. `upper` must be non-zero.
    pub fn gen_index(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }

    /// Uniform float in `[0, 1)`
    pub fn gen_f32(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Shuffle a slice in place (uniform permutation).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}

impl Default for WazeRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
