//! Deterministic noise for tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// `n` standard normal draws from `seed`.
pub(crate) fn white_noise(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        assert_eq!(white_noise(20, 42), white_noise(20, 42));
        assert_ne!(white_noise(20, 42), white_noise(20, 43));
    }
}
