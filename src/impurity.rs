//! Pure impurity measures: Gini impurity, Shannon entropy, and their
//! sample-weighted combination across a split's two children.

use crate::error::{ArboriaError, Result};
use crate::helpers::count_classes;
use crate::policy::Criterion;

const PROPORTION_EPS: f32 = 1e-6;

fn check_proportions(component: &str, p1: f32, p2: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&p1) || !(0.0..=1.0).contains(&p2) {
        return Err(ArboriaError::invalid_argument(
            component,
            "proportions must be in [0,1]",
        ));
    }
    if ((p1 + p2) - 1.0).abs() > PROPORTION_EPS {
        return Err(ArboriaError::invalid_argument(
            component,
            "sum of proportions does not add up to one",
        ));
    }
    Ok(())
}

/// Gini impurity `1 - p1^2 - p2^2` from class proportions.
pub fn gini(p1: f32, p2: f32) -> Result<f32> {
    check_proportions("impurity::gini", p1, p2)?;
    Ok(1.0 - p1 * p1 - p2 * p2)
}

/// Gini impurity from class counts.
pub fn gini_counts(n1: u32, n2: u32) -> Result<f32> {
    let denom = (n1 + n2) as f32;
    if denom == 0.0 {
        return Err(ArboriaError::invalid_argument(
            "impurity::gini",
            "node is empty",
        ));
    }
    gini(n1 as f32 / denom, n2 as f32 / denom)
}

/// Shannon entropy `-sum p_i log2(p_i)` (with `0 log2 0 = 0`) from class
/// proportions.
pub fn entropy(p1: f32, p2: f32) -> Result<f32> {
    check_proportions("impurity::entropy", p1, p2)?;
    let mut h = 0.0;
    if p1 > 0.0 {
        h -= p1 * p1.log2();
    }
    if p2 > 0.0 {
        h -= p2 * p2.log2();
    }
    Ok(h)
}

/// Shannon entropy from class counts.
pub fn entropy_counts(n1: u32, n2: u32) -> Result<f32> {
    let denom = (n1 + n2) as f32;
    if denom == 0.0 {
        return Err(ArboriaError::invalid_argument(
            "impurity::entropy",
            "node is empty",
        ));
    }
    entropy(n1 as f32 / denom, n2 as f32 / denom)
}

/// `gini`/`entropy` computed over a vector of binary labels.
pub fn impurity_of_labels(criterion: Criterion, labels: &[f32]) -> Result<f32> {
    if labels.is_empty() {
        return Err(ArboriaError::invalid_argument(
            "impurity::impurity_of_labels",
            "the passed vector is empty",
        ));
    }
    let (pos, neg) = count_classes(labels)?;
    match criterion {
        Criterion::Gini => gini_counts(pos, neg),
        Criterion::Entropy => entropy_counts(pos, neg),
        Criterion::Undefined => Err(ArboriaError::logic_error(
            "impurity::impurity_of_labels",
            "criterion is Undefined",
        )),
    }
}

/// Weighted impurity of a split, given per-child class counts:
/// `(|L|/N) * impurity(L) + (|R|/N) * impurity(R)`, with an empty side
/// contributing `0`.
///
/// # Errors
/// Returns [`ArboriaError::InvalidArgument`] if any count is negative (not
/// representable here, as counts are `u32`) or if the total is zero.
pub fn weighted_impurity(
    criterion: Criterion,
    l_pos: u32,
    l_neg: u32,
    r_pos: u32,
    r_neg: u32,
) -> Result<f32> {
    let l_size = l_pos + l_neg;
    let r_size = r_pos + r_neg;
    let total = l_size + r_size;
    if total == 0 {
        return Err(ArboriaError::invalid_argument(
            "impurity::weighted_impurity",
            "no samples were passed",
        ));
    }

    let left = if l_size > 0 {
        score_counts(criterion, l_pos, l_neg)?
    } else {
        0.0
    };
    let right = if r_size > 0 {
        score_counts(criterion, r_pos, r_neg)?
    } else {
        0.0
    };

    let total = total as f32;
    Ok((l_size as f32 / total) * left + (r_size as f32 / total) * right)
}

fn score_counts(criterion: Criterion, n1: u32, n2: u32) -> Result<f32> {
    match criterion {
        Criterion::Gini => gini_counts(n1, n2),
        Criterion::Entropy => entropy_counts(n1, n2),
        Criterion::Undefined => Err(ArboriaError::logic_error(
            "impurity::weighted_impurity",
            "criterion is Undefined",
        )),
    }
}
