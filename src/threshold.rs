//! CART threshold candidate generation: midpoints between consecutive
//! distinct values of a feature, over row indices already sorted ascending
//! on that feature.

use crate::dataset::Dataset;
use crate::error::{ArboriaError, Result};

/// Candidate thresholds for `feature`, given `sorted_idx` — row indices
/// already sorted ascending by `data[.., feature]`.
///
/// One candidate per pair of consecutive *distinct* values, each the
/// midpoint `(a+b)/2`; duplicate values produce no candidate (no
/// zero-width intervals). Output length is at most `sorted_idx.len() - 1`
/// and may be `0` if every value is equal.
///
/// # Errors
/// Returns [`ArboriaError::InvalidArgument`] if the dataset is empty, if
/// `feature` is out of range, or if `sorted_idx.len() < 2`.
pub fn cart_thresholds(sorted_idx: &[usize], feature: usize, data: &Dataset) -> Result<Vec<f32>> {
    if data.is_empty() {
        return Err(ArboriaError::invalid_argument(
            "threshold::cart_thresholds",
            "dataset is empty",
        ));
    }
    if feature >= data.n_cols() {
        return Err(ArboriaError::invalid_argument(
            "threshold::cart_thresholds",
            "no such column in the dataset",
        ));
    }
    if sorted_idx.len() < 2 {
        return Err(ArboriaError::invalid_argument(
            "threshold::cart_thresholds",
            "the idx slice must reference at least two values",
        ));
    }

    let mut output = Vec::with_capacity(sorted_idx.len() - 1);
    for window in sorted_idx.windows(2) {
        let a = data.iloc_x(window[0], feature)?;
        let b = data.iloc_x(window[1], feature)?;
        if a == b {
            continue;
        }
        output.push((a + b) / 2.0);
    }
    Ok(output)
}
