//! The split-search engine: orchestrates feature selection, the sorted
//! sweep with incremental count maintenance, impurity scoring, and
//! best-split tracking.

use crate::dataset::Dataset;
use crate::error::{ArboriaError, Result};
use crate::features::{all_features, random_k};
use crate::helpers::count_classes_at;
use crate::impurity::weighted_impurity;
use crate::policy::{Criterion, FeatureSelection, SplitContext, SplitPolicy, SplitResult, SplitStats};
use crate::threshold::cart_thresholds;

/// Searches for the best split of `idx` under `policy`.
///
/// `idx` is the set of row indices belonging to the current node. Returns
/// the best split found, or [`SplitResult::none`] if none improves on "no
/// split" (e.g. every feature is constant over `idx`).
///
/// `ctx` supplies the RNG state `RandomK` feature selection needs; it is
/// `None` for `AllFeatures` policies.
///
/// # Errors
/// Returns [`ArboriaError::InvalidArgument`] if the dataset or `idx` is
/// empty, or if `policy.feature_selection` is `RandomK` but `ctx` is
/// `None` or `mtry` is out of `[1, n_cols]`. Returns
/// [`ArboriaError::LogicError`] if `policy.criterion` or
/// `policy.feature_selection` is `Undefined`.
pub fn best_split(
    idx: &[usize],
    data: &Dataset,
    policy: &SplitPolicy,
    ctx: Option<&mut SplitContext>,
) -> Result<SplitResult> {
    if data.is_empty() {
        return Err(ArboriaError::invalid_argument(
            "best_split",
            "dataset is empty",
        ));
    }
    if idx.is_empty() {
        return Err(ArboriaError::invalid_argument("best_split", "idx is empty"));
    }
    if idx.len() <= 1 {
        return Ok(SplitResult::none());
    }

    let n_cols = data.n_cols();
    let candidates = match policy.feature_selection {
        FeatureSelection::AllFeatures => all_features(n_cols),
        FeatureSelection::RandomK(mtry) => {
            if mtry == 0 || mtry > n_cols {
                return Err(ArboriaError::invalid_argument(
                    "best_split",
                    "mtry must be in [1, n_cols]",
                ));
            }
            let ctx = ctx.ok_or_else(|| {
                ArboriaError::invalid_argument(
                    "best_split",
                    "RandomK feature selection requires a SplitContext",
                )
            })?;
            random_k(&all_features(n_cols), mtry, &mut ctx.rng)?
        }
        FeatureSelection::Undefined => {
            return Err(ArboriaError::logic_error(
                "best_split",
                "feature selection is Undefined",
            ))
        }
    };

    let criterion = policy.criterion;
    if criterion == Criterion::Undefined {
        return Err(ArboriaError::logic_error(
            "best_split",
            "criterion is Undefined",
        ));
    }

    let mut best_score = f32::INFINITY;
    let mut best = SplitResult::none();

    for feature in candidates {
        // Dataset::new rejects NaN features, so every comparison here is total.
        let mut sorted_idx: Vec<usize> = idx.to_vec();
        sorted_idx.sort_unstable_by(|&a, &b| {
            data.iloc_x(a, feature)
                .unwrap()
                .total_cmp(&data.iloc_x(b, feature).unwrap())
        });

        let thresholds = cart_thresholds(&sorted_idx, feature, data)?;
        if thresholds.is_empty() {
            continue;
        }

        let (total_pos, total_neg) = count_classes_at(idx, data.y())?;
        let mut stats = SplitStats {
            l_pos: 0,
            l_neg: 0,
            r_pos: total_pos,
            r_neg: total_neg,
        };
        let mut cursor = 0usize;

        for t in thresholds {
            while cursor < sorted_idx.len() && data.iloc_x(sorted_idx[cursor], feature)? < t {
                if data.iloc_y(sorted_idx[cursor])? >= 0.5 {
                    stats.l_pos += 1;
                    stats.r_pos -= 1;
                } else {
                    stats.l_neg += 1;
                    stats.r_neg -= 1;
                }
                cursor += 1;
            }

            if (stats.l_pos + stats.l_neg) == 0 || (stats.r_pos + stats.r_neg) == 0 {
                continue;
            }

            let score = weighted_impurity(criterion, stats.l_pos, stats.l_neg, stats.r_pos, stats.r_neg)?;
            if score < best_score {
                best_score = score;
                best = SplitResult {
                    feature_index: feature as i64,
                    threshold: t,
                    score,
                };
                if score == 0.0 {
                    return Ok(best);
                }
            }
        }
    }

    Ok(best)
}
