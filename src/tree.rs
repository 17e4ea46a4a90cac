//! A single axis-aligned decision tree: node representation, recursive
//! growing with in-place index partitioning, and prediction.

use crate::dataset::Dataset;
use crate::error::{ArboriaError, Result};
use crate::helpers::count_classes_at;
use crate::policy::{SplitContext, SplitPolicy, Task};
use crate::splitter::best_split;

/// A node in a fitted tree.
///
/// Each internal node exclusively owns its two children; the tree
/// exclusively owns the root. There is no sharing and no cycles, so
/// destruction, move, and (in the forest) thread-local construction are
/// trivial.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf { value: u8 },
    Internal {
        feature_index: usize,
        threshold: f32,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// Validity predicate for an internal node: feature index in range,
    /// threshold finite, both children present. Always true for a leaf.
    fn is_valid(&self, n_features: usize) -> bool {
        match self {
            Node::Leaf { .. } => true,
            Node::Internal {
                feature_index,
                threshold,
                ..
            } => *feature_index < n_features && threshold.is_finite(),
        }
    }
}

/// Hyperparameters accepted by [`DecisionTree::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeHyperParams {
    pub max_depth: Option<usize>,
    pub min_sample_split: Option<usize>,
}

/// A single axis-aligned binary decision tree.
#[derive(Debug)]
pub struct DecisionTree {
    root: Option<Node>,
    num_features: usize,
    fitted: bool,
    task: Task,
    max_depth: Option<usize>,
    min_sample_split: Option<usize>,
}

impl DecisionTree {
    /// Constructs an unfitted tree.
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] if `max_depth` is set and
    /// `< 1`, or if `min_sample_split` is set and `< 2`.
    pub fn new(params: TreeHyperParams, task: Task) -> Result<Self> {
        if let Some(d) = params.max_depth {
            if d < 1 {
                return Err(ArboriaError::invalid_argument(
                    "DecisionTree::new",
                    "max_depth must be >= 1 when set",
                ));
            }
        }
        if let Some(m) = params.min_sample_split {
            if m < 2 {
                return Err(ArboriaError::invalid_argument(
                    "DecisionTree::new",
                    "min_sample_split must be >= 2 when set",
                ));
            }
        }
        Ok(DecisionTree {
            root: None,
            num_features: 0,
            fitted: false,
            task,
            max_depth: params.max_depth,
            min_sample_split: params.min_sample_split,
        })
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn min_sample_split(&self) -> Option<usize> {
        self.min_sample_split
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Fits the tree on the full dataset.
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] if `data` has `n_rows <=
    /// 1`, or if `policy` has an `Undefined` component.
    pub fn fit(&mut self, data: &Dataset, policy: &SplitPolicy) -> Result<()> {
        if data.n_rows() <= 1 {
            return Err(ArboriaError::invalid_argument(
                "DecisionTree::fit",
                "dataset must have more than one row",
            ));
        }
        if policy.has_undefined() {
            return Err(ArboriaError::invalid_argument(
                "DecisionTree::fit",
                "policy contains an undefined component",
            ));
        }
        let idx: Vec<usize> = (0..data.n_rows()).collect();
        self.fit_with(data, &idx, policy, None)
    }

    /// Fits the tree starting from a caller-supplied index subset,
    /// optionally sharing an externally-owned [`SplitContext`] across the
    /// entire tree's construction (used by [`crate::forest::RandomForest`]
    /// so every `RandomK` decision in one tree shares a single RNG
    /// stream).
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] if `data` has `n_rows <=
    /// 1`.
    pub fn fit_with(
        &mut self,
        data: &Dataset,
        idx: &[usize],
        policy: &SplitPolicy,
        mut ctx: Option<&mut SplitContext>,
    ) -> Result<()> {
        if data.n_rows() <= 1 {
            return Err(ArboriaError::invalid_argument(
                "DecisionTree::fit",
                "dataset must have more than one row",
            ));
        }
        let mut buffer = idx.to_vec();
        let root = self.grow(data, &mut buffer, 0, policy, ctx.as_deref_mut())?;
        self.root = Some(root);
        self.num_features = data.n_cols();
        self.fitted = true;
        Ok(())
    }

    fn grow(
        &self,
        data: &Dataset,
        idx: &mut [usize],
        depth: usize,
        policy: &SplitPolicy,
        mut ctx: Option<&mut SplitContext>,
    ) -> Result<Node> {
        let (pos_count, neg_count) = count_classes_at(idx, data.y())?;

        let leaf = || -> Result<Node> {
            match self.task {
                Task::Classification => {
                    // ties go to class 1
                    let value = if pos_count >= neg_count { 1 } else { 0 };
                    Ok(Node::Leaf { value })
                }
                Task::Regression => Err(ArboriaError::logic_error(
                    "DecisionTree::grow",
                    "regression is not implemented",
                )),
            }
        };

        if idx.len() <= 1 {
            return leaf();
        }
        if pos_count == 0 || neg_count == 0 {
            return leaf();
        }
        if let Some(max_depth) = self.max_depth {
            if depth == max_depth {
                return leaf();
            }
        }
        if let Some(min_sample_split) = self.min_sample_split {
            if idx.len() <= min_sample_split {
                return leaf();
            }
        }

        let split = best_split(idx, data, policy, ctx.as_deref_mut())?;
        if !split.has_split() {
            return leaf();
        }

        let feature_index = split.feature_index as usize;
        let threshold = split.threshold;

        let mid = partition_by_threshold(idx, data, feature_index, threshold)?;
        if mid == 0 || mid == idx.len() {
            // defensive: best_split should never hand back an empty side
            return leaf();
        }

        let (left_idx, right_idx) = idx.split_at_mut(mid);
        let left = self.grow(data, left_idx, depth + 1, policy, ctx.as_deref_mut())?;
        let right = self.grow(data, right_idx, depth + 1, policy, ctx)?;

        Ok(Node::Internal {
            feature_index,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Predicts the class of a single sample.
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] if the tree is not
    /// fitted, if `sample.len() != num_features()`, or if `sample`
    /// contains a NaN.
    pub fn predict_one(&self, sample: &[f32]) -> Result<u8> {
        if !self.fitted {
            return Err(ArboriaError::invalid_argument(
                "DecisionTree::predict_one",
                "tree has not been fitted",
            ));
        }
        if sample.len() != self.num_features {
            return Err(ArboriaError::invalid_argument(
                "DecisionTree::predict_one",
                "sample has a different number of features than seen in training",
            ));
        }
        let root = self.root.as_ref().expect("fitted implies a root exists");
        predict_recursive(root, sample, self.num_features)
    }

    /// Predicts classes for a flattened, row-major batch of samples.
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] if the tree is not
    /// fitted, or if `samples.len()` is not a multiple of
    /// `num_features()`.
    pub fn predict(&self, samples: &[f32]) -> Result<Vec<u8>> {
        if !self.fitted || self.num_features == 0 {
            return Err(ArboriaError::invalid_argument(
                "DecisionTree::predict",
                "tree has not been fitted",
            ));
        }
        if samples.len() % self.num_features != 0 {
            return Err(ArboriaError::invalid_argument(
                "DecisionTree::predict",
                "samples do not have the correct dimension",
            ));
        }
        samples
            .chunks(self.num_features)
            .map(|row| self.predict_one(row))
            .collect()
    }
}

fn predict_recursive(node: &Node, sample: &[f32], n_features: usize) -> Result<u8> {
    match node {
        Node::Leaf { value } => Ok(*value),
        Node::Internal {
            feature_index,
            threshold,
            left,
            right,
        } => {
            debug_assert!(
                node.is_valid(n_features),
                "DecisionTree::predict_one: an invalid internal node was reached"
            );
            let feature_value = sample[*feature_index];
            if feature_value.is_nan() {
                return Err(ArboriaError::invalid_argument(
                    "DecisionTree::predict_one",
                    "sample contains NaN",
                ));
            }
            if feature_value < *threshold {
                predict_recursive(left, sample, n_features)
            } else {
                predict_recursive(right, sample, n_features)
            }
        }
    }
}

/// Partitions `idx` in place so that rows with `x[.., feature] < threshold`
/// come first; returns the split point. Mirrors the routing rule used at
/// predict time: strictly-less goes left, everything else goes right.
fn partition_by_threshold(
    idx: &mut [usize],
    data: &Dataset,
    feature: usize,
    threshold: f32,
) -> Result<usize> {
    let mut i = 0;
    for j in 0..idx.len() {
        if data.iloc_x(idx[j], feature)? < threshold {
            idx.swap(i, j);
            i += 1;
        }
    }
    Ok(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Criterion, FeatureSelection, ThresholdRule};

    fn gini_policy() -> SplitPolicy {
        SplitPolicy {
            task: Task::Classification,
            criterion: Criterion::Gini,
            threshold_rule: ThresholdRule::Cart,
            feature_selection: FeatureSelection::AllFeatures,
        }
    }

    #[test]
    fn constructor_validates_hyperparams() {
        let bad_depth = TreeHyperParams {
            max_depth: Some(0),
            min_sample_split: None,
        };
        assert!(DecisionTree::new(bad_depth, Task::Classification).is_err());

        let bad_split = TreeHyperParams {
            max_depth: None,
            min_sample_split: Some(1),
        };
        assert!(DecisionTree::new(bad_split, Task::Classification).is_err());
    }

    #[test]
    fn trivial_classes_scenario() {
        let data = Dataset::new(
            vec![
                0.0, 2.0, 1.0, 7.0, 9.0, 10.0, 1.0, 1.0, 2.0, 11.0, 9.0, 8.0, 2.0, 0.0, 1.0,
            ],
            vec![0.0, 1.0, 0.0, 1.0, 0.0],
            5,
            3,
        )
        .unwrap();
        let mut tree = DecisionTree::new(
            TreeHyperParams {
                max_depth: Some(4),
                min_sample_split: None,
            },
            Task::Classification,
        )
        .unwrap();
        tree.fit(&data, &gini_policy()).unwrap();

        assert_eq!(tree.predict_one(&[8.0, 9.0, 10.0]).unwrap(), 1);
        assert_eq!(tree.predict_one(&[1.0, 0.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn unsplittable_constant_features_become_leaf_with_tie_break() {
        let data = Dataset::new(
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            vec![0.0, 1.0, 1.0, 0.0],
            4,
            2,
        )
        .unwrap();
        let mut tree =
            DecisionTree::new(TreeHyperParams::default(), Task::Classification).unwrap();
        tree.fit(&data, &gini_policy()).unwrap();
        assert_eq!(tree.predict_one(&[1.0, 1.0]).unwrap(), 1);
    }

    #[test]
    fn predict_before_fit_is_invalid_argument() {
        let tree = DecisionTree::new(TreeHyperParams::default(), Task::Classification).unwrap();
        assert!(tree.predict_one(&[1.0]).is_err());
    }

    #[test]
    fn predict_rejects_wrong_dimension_and_nan() {
        let data = Dataset::new(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            vec![0.0, 1.0, 0.0, 1.0],
            4,
            2,
        )
        .unwrap();
        let mut tree =
            DecisionTree::new(TreeHyperParams::default(), Task::Classification).unwrap();
        tree.fit(&data, &gini_policy()).unwrap();

        assert!(tree.predict_one(&[1.0]).is_err());
        assert!(tree.predict_one(&[1.0, f32::NAN]).is_err());
    }

    #[test]
    fn fit_rejects_trivial_dataset() {
        let data = Dataset::new(vec![1.0], vec![0.0], 1, 1).unwrap();
        let mut tree =
            DecisionTree::new(TreeHyperParams::default(), Task::Classification).unwrap();
        assert!(tree.fit(&data, &gini_policy()).is_err());
    }
}
