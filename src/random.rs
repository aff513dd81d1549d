//! Random source construction.
//!
//! Every random draw made by the engine or by a strategy goes through one
//! [`GaRng`] owned by the run, so a seed fully determines the outcome.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The random number generator handed to strategies.
pub type GaRng = StdRng;

/// Creates a generator from a fixed seed.
pub fn create_rng(seed: u64) -> GaRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from OS entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> GaRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
