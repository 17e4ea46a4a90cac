//! Small, pure utilities shared across the crate: class counting, accuracy,
//! and deterministic per-tree seed derivation.

use crate::error::{ArboriaError, Result};

const BINARY_EPS: f32 = 1e-6;

fn classify_label(label: f32) -> Result<bool> {
    if (label - 0.0).abs() < BINARY_EPS {
        Ok(false)
    } else if (label - 1.0).abs() < BINARY_EPS {
        Ok(true)
    } else {
        Err(ArboriaError::invalid_argument(
            "helpers::count_classes",
            "non-binary label detected: label not in {0,1}",
        ))
    }
}

/// Counts of positive (1) and negative (0) labels in `labels`.
///
/// # Errors
/// Returns [`ArboriaError::InvalidArgument`] if any label is not in `{0,1}`.
pub fn count_classes(labels: &[f32]) -> Result<(u32, u32)> {
    let mut pos = 0u32;
    let mut neg = 0u32;
    for &label in labels {
        if classify_label(label)? {
            pos += 1;
        } else {
            neg += 1;
        }
    }
    Ok((pos, neg))
}

/// Counts of positive and negative labels among `targets`, restricted to
/// the rows named by `idx`.
///
/// # Errors
/// Returns [`ArboriaError::OutOfRange`] if an index is out of bounds for
/// `targets`, or [`ArboriaError::InvalidArgument`] if a referenced label is
/// not in `{0,1}`.
pub fn count_classes_at(idx: &[usize], targets: &[f32]) -> Result<(u32, u32)> {
    let mut pos = 0u32;
    let mut neg = 0u32;
    for &i in idx {
        if i >= targets.len() {
            return Err(ArboriaError::out_of_range(
                "helpers::count_classes",
                "one of the referenced indices is out of bounds for the target vector",
            ));
        }
        if classify_label(targets[i])? {
            pos += 1;
        } else {
            neg += 1;
        }
    }
    Ok((pos, neg))
}

/// Fraction of entries at which `a` and `b` agree.
///
/// # Errors
/// Returns [`ArboriaError::InvalidArgument`] if `a` and `b` differ in
/// length, or if both are empty.
pub fn accuracy(a: &[u8], b: &[u8]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ArboriaError::invalid_argument(
            "helpers::accuracy",
            "passed arguments have different length",
        ));
    }
    if a.is_empty() {
        return Err(ArboriaError::invalid_argument(
            "helpers::accuracy",
            "passed arguments are empty",
        ));
    }
    let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
    Ok(matches as f32 / a.len() as f32)
}

/// Derives a per-tree seed from a master seed and a tree index.
///
/// A deliberately simple 64-bit wrapping mixer: sufficient to decorrelate
/// per-tree RNG streams while keeping forest training bitwise reproducible
/// given the master seed, regardless of the order trees are claimed in.
pub fn derive_seed(master: u64, i: u64) -> u64 {
    master.wrapping_add(0x9E3779B97F4A7C15u64.wrapping_mul(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_classes_basic() {
        assert_eq!(count_classes(&[0.0, 1.0, 1.0, 0.0]).unwrap(), (2, 2));
    }

    #[test]
    fn count_classes_rejects_non_binary() {
        assert!(count_classes(&[0.0, 0.5]).is_err());
    }

    #[test]
    fn count_classes_at_checks_bounds() {
        let targets = [0.0, 1.0, 1.0];
        assert_eq!(count_classes_at(&[0, 1, 2], &targets).unwrap(), (2, 1));
        assert!(count_classes_at(&[3], &targets).is_err());
    }

    #[test]
    fn accuracy_basic() {
        assert_eq!(accuracy(&[1, 0, 1, 1], &[1, 0, 0, 1]).unwrap(), 0.75);
        assert!(accuracy(&[], &[]).is_err());
        assert!(accuracy(&[1], &[1, 0]).is_err());
    }

    #[test]
    fn derive_seed_is_deterministic_and_order_independent() {
        let a = derive_seed(42, 7);
        let b = derive_seed(42, 7);
        assert_eq!(a, b);
        assert_ne!(derive_seed(42, 1), derive_seed(42, 2));
    }
}
