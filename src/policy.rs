//! Tagged-variant types describing what a split is governed by: the task,
//! the impurity criterion, the threshold rule, and the feature-selection
//! rule, plus the per-call RNG context and the split-search result.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// What kind of prediction target the tree is being grown for.
///
/// `Regression` is a reserved tag: this crate implements classification
/// only (spec Non-goal), so any split search dispatched with `Regression`
/// fails with a [`crate::error::ArboriaError::LogicError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Classification,
    Regression,
}

/// Impurity criterion used to score candidate splits.
///
/// `Undefined` is a sentinel meaning "the caller has not resolved a
/// default yet" — see [`crate::builder::param_builder`]. Reaching a split
/// search with `Undefined` is a caller contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    Gini,
    Entropy,
    #[default]
    Undefined,
}

/// Candidate-threshold generation rule.
///
/// `Random` and `Quantile` are named for parity with the original source's
/// `ThresholdComputation` enum but are never dispatched — out of scope per
/// spec.md §1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdRule {
    Cart,
    #[default]
    Undefined,
}

/// Feature-selection rule consulted at every split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureSelection {
    AllFeatures,
    RandomK(usize),
    #[default]
    Undefined,
}

impl FeatureSelection {
    pub fn is_undefined(&self) -> bool {
        matches!(self, FeatureSelection::Undefined)
    }
}

/// The tuple `(task, criterion, threshold-rule, feature-selection-rule)`
/// consulted at every split.
#[derive(Debug, Clone, Copy)]
pub struct SplitPolicy {
    pub task: Task,
    pub criterion: Criterion,
    pub threshold_rule: ThresholdRule,
    pub feature_selection: FeatureSelection,
}

impl SplitPolicy {
    /// True iff any component is the `Undefined` sentinel.
    pub fn has_undefined(&self) -> bool {
        self.criterion == Criterion::Undefined
            || self.threshold_rule == ThresholdRule::Undefined
            || self.feature_selection.is_undefined()
    }
}

/// Per-call RNG state threaded through a splitter invocation. One context
/// is shared across an entire tree's construction, so `RandomK` decisions
/// inside that tree draw from a single, reproducible RNG stream.
pub struct SplitContext {
    pub rng: ChaCha8Rng,
}

impl SplitContext {
    pub fn new(seed: u64) -> Self {
        SplitContext {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

/// Outcome of a best-split search.
///
/// The sentinel "no split found" is `feature_index = -1, score = +inf`;
/// [`SplitResult::has_split`] is the associated predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitResult {
    pub feature_index: i64,
    pub threshold: f32,
    pub score: f32,
}

impl SplitResult {
    /// The "no split found" sentinel.
    pub fn none() -> Self {
        SplitResult {
            feature_index: -1,
            threshold: f32::NAN,
            score: f32::INFINITY,
        }
    }

    pub fn has_split(&self) -> bool {
        self.feature_index >= 0 && self.score.is_finite()
    }
}

impl Default for SplitResult {
    fn default() -> Self {
        SplitResult::none()
    }
}

/// Per-child class counts collected during the sorted sweep; `l_pos +
/// l_neg + r_pos + r_neg` must equal the parent's sample count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStats {
    pub l_pos: u32,
    pub l_neg: u32,
    pub r_pos: u32,
    pub r_neg: u32,
}
