//! Feature selection consulted at every split: either the full feature
//! set, or a uniform random subset of size `mtry` drawn via a Fisher–Yates
//! partial shuffle.

use rand::Rng;

use crate::error::{ArboriaError, Result};

/// Identity permutation over `[0, n_cols)`.
pub fn all_features(n_cols: usize) -> Vec<usize> {
    (0..n_cols).collect()
}

/// `mtry` distinct indices drawn uniformly without replacement from
/// `pool`, via a Fisher–Yates partial shuffle over a local copy of `pool`
/// (keeping the first `mtry` positions after the shuffle).
///
/// # Errors
/// Returns [`ArboriaError::InvalidArgument`] if `pool` is empty, if `mtry
/// == 0`, or if `mtry > pool.len()`.
pub fn random_k<R: Rng>(pool: &[usize], mtry: usize, rng: &mut R) -> Result<Vec<usize>> {
    if pool.is_empty() {
        return Err(ArboriaError::invalid_argument(
            "features::random_k",
            "the feature pool is empty",
        ));
    }
    if mtry == 0 || mtry > pool.len() {
        return Err(ArboriaError::invalid_argument(
            "features::random_k",
            "mtry must be in [1, pool length]",
        ));
    }

    let mut vec: Vec<usize> = pool.to_vec();
    for i in 0..mtry {
        let j = rng.gen_range(i..vec.len());
        vec.swap(i, j);
    }
    vec.truncate(mtry);
    Ok(vec)
}
