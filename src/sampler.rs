//! Index-generation primitives backing bagging: with-replacement draws
//! (bootstrap) and without-replacement partial shuffles (subsample).

use rand::Rng;

use crate::error::{ArboriaError, Result};

/// Draws `k` independent uniform indices from `[0, n)`, with replacement.
///
/// # Errors
/// Returns [`ArboriaError::InvalidArgument`] if `n == 0` or `k == 0`.
pub fn bootstrap<R: Rng>(n: usize, k: usize, rng: &mut R) -> Result<Vec<usize>> {
    if n == 0 {
        return Err(ArboriaError::invalid_argument(
            "sampler::bootstrap",
            "population size must be greater than zero",
        ));
    }
    if k == 0 {
        return Err(ArboriaError::invalid_argument(
            "sampler::bootstrap",
            "number of draws must be strictly positive",
        ));
    }
    Ok((0..k).map(|_| rng.gen_range(0..n)).collect())
}

/// Draws `k` distinct indices from `[0, n)` without replacement, via a
/// Fisher–Yates partial shuffle.
///
/// # Errors
/// Returns [`ArboriaError::InvalidArgument`] if `n == 0`, `k == 0`, or `k >
/// n`.
pub fn subsample<R: Rng>(n: usize, k: usize, rng: &mut R) -> Result<Vec<usize>> {
    if n == 0 {
        return Err(ArboriaError::invalid_argument(
            "sampler::subsample",
            "population size must be greater than zero",
        ));
    }
    if k == 0 || k > n {
        return Err(ArboriaError::invalid_argument(
            "sampler::subsample",
            "number of drawn samples must be strictly positive and at most the population size",
        ));
    }

    let mut vec: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.gen_range(i..n);
        vec.swap(i, j);
    }
    vec.truncate(k);
    Ok(vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn bootstrap_draws_k_indices_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let draws = bootstrap(5, 10, &mut rng).unwrap();
        assert_eq!(draws.len(), 10);
        assert!(draws.iter().all(|&i| i < 5));
    }

    #[test]
    fn bootstrap_rejects_zero_args() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(bootstrap(0, 1, &mut rng).is_err());
        assert!(bootstrap(1, 0, &mut rng).is_err());
    }

    #[test]
    fn subsample_draws_k_distinct_indices() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let draws = subsample(10, 4, &mut rng).unwrap();
        assert_eq!(draws.len(), 4);
        let mut sorted = draws.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);
        assert!(draws.iter().all(|&i| i < 10));
    }

    #[test]
    fn subsample_rejects_invalid_k() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(subsample(0, 1, &mut rng).is_err());
        assert!(subsample(5, 0, &mut rng).is_err());
        assert!(subsample(5, 6, &mut rng).is_err());
    }
}
