//! Seed derivation
//!
//! Every random choice of a run is derived from a small integer seed. A fresh
//! ChaCha8 generator is seeded from the input on every call, so a recorded
//! seed replays the exact same chain in any process on any platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::models::Seed;

/// Lowest seed drawn at random (inclusive)
pub const DEFAULT_SEED_LOW: Seed = 100;

/// Upper seed bound (exclusive)
pub const DEFAULT_SEED_HIGH: Seed = 999;

/// Seed derivation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("Invalid range: low ({low}) must be below high ({high})")]
    InvalidRange { low: u64, high: u64 },
}

/// Generator and advancer of the seed chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedSequence {
    low: Seed,
    high: Seed,
}

impl SeedSequence {
    /// Create a sequence drawing seeds from `[low, high)`
    pub fn new(low: Seed, high: Seed) -> Result<Self, SeedError> {
        if low >= high {
            return Err(SeedError::InvalidRange {
                low: low.into(),
                high: high.into(),
            });
        }
        Ok(Self { low, high })
    }

    /// Draw a start seed uniformly from the configured range
    pub fn draw_initial(&self) -> Seed {
        rand::rng().random_range(self.low..self.high)
    }

    /// Next seed in the chain. Pure function of `seed`.
    pub fn advance(&self, seed: Seed) -> Seed {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.into());
        rng.random_range(self.low..self.high)
    }

    /// Pick an integer in `[low, high)` determined only by `seed`
    pub fn pick(low: usize, high: usize, seed: Seed) -> Result<usize, SeedError> {
        if low >= high {
            return Err(SeedError::InvalidRange {
                low: low as u64,
                high: high as u64,
            });
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed.into());
        Ok(rng.random_range(low..high))
    }
}

impl Default for SeedSequence {
    fn default() -> Self {
        Self {
            low: DEFAULT_SEED_LOW,
            high: DEFAULT_SEED_HIGH,
        }
    }
}
