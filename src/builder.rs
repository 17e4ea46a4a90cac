//! Fills in [`SplitPolicy`] defaults given a model family and task. The
//! single place default policy values live, so they are never scattered
//! across `DecisionTree`/`RandomForest` construction.

use crate::error::Result;
use crate::policy::{Criterion, FeatureSelection, SplitPolicy, Task, ThresholdRule};

/// Which model family a [`SplitPolicy`] is being built for — governs the
/// default feature-selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    DecisionTree,
    RandomForest,
}

/// Optional, per-field overrides accepted by [`param_builder`]. Any field
/// left `None` is filled with the family-appropriate default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParamOverrides {
    pub criterion: Option<Criterion>,
    pub threshold_rule: Option<ThresholdRule>,
    pub feature_selection: Option<FeatureSelection>,
}

/// Builds a fully-specified [`SplitPolicy`] from `task`, `model`, and any
/// subset of `overrides`.
///
/// Defaults: `criterion = Gini`, `threshold_rule = Cart`, and
/// `feature_selection = AllFeatures` for a single tree or `RandomK` for a
/// forest (the forest resolves the actual `mtry` at fit time — see
/// [`crate::forest::RandomForest::fit`] — so the placeholder value here is
/// irrelevant and immediately overwritten).
///
/// `task` has no default and must always be supplied by the caller.
pub fn param_builder(
    model: ModelFamily,
    task: Task,
    overrides: ParamOverrides,
) -> Result<SplitPolicy> {
    let criterion = overrides.criterion.unwrap_or(Criterion::Gini);
    let threshold_rule = overrides.threshold_rule.unwrap_or(ThresholdRule::Cart);
    let feature_selection = overrides.feature_selection.unwrap_or(match model {
        ModelFamily::DecisionTree => FeatureSelection::AllFeatures,
        ModelFamily::RandomForest => FeatureSelection::RandomK(1),
    });

    Ok(SplitPolicy {
        task,
        criterion,
        threshold_rule,
        feature_selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_tree_defaults_to_all_features() {
        let policy = param_builder(ModelFamily::DecisionTree, Task::Classification, ParamOverrides::default())
            .unwrap();
        assert_eq!(policy.criterion, Criterion::Gini);
        assert_eq!(policy.threshold_rule, ThresholdRule::Cart);
        assert_eq!(policy.feature_selection, FeatureSelection::AllFeatures);
    }

    #[test]
    fn random_forest_defaults_to_random_k() {
        let policy = param_builder(ModelFamily::RandomForest, Task::Classification, ParamOverrides::default())
            .unwrap();
        assert!(matches!(policy.feature_selection, FeatureSelection::RandomK(_)));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let overrides = ParamOverrides {
            criterion: Some(Criterion::Entropy),
            ..Default::default()
        };
        let policy = param_builder(ModelFamily::DecisionTree, Task::Classification, overrides).unwrap();
        assert_eq!(policy.criterion, Criterion::Entropy);
    }
}
