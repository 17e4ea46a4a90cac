//! Bagged ensemble of decision trees: bootstrap sampling, per-tree seed
//! derivation, a bounded `rayon` worker pool for parallel training and
//! prediction, out-of-bag bookkeeping, and majority-vote aggregation.

use rand::Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon::slice::ParallelSlice;

use crate::dataset::Dataset;
use crate::error::{ArboriaError, Result};
use crate::helpers::derive_seed;
use crate::policy::{FeatureSelection, SplitContext, SplitPolicy};
use crate::sampler::bootstrap;
use crate::tree::{DecisionTree, TreeHyperParams};

/// One tree of the ensemble, paired with the bootstrap in-bag membership
/// used for out-of-bag scoring.
struct ForestTree {
    tree: DecisionTree,
    in_bag: Vec<bool>,
}

/// Hyperparameters accepted by [`RandomForest::new`].
///
/// `mtry` accepts the two sentinel values the original source's
/// constructor parses but never resolves: `-99` ("auto", resolved to
/// `floor(sqrt(n_cols))`) and `-98` ("auto-log", resolved to
/// `floor(log2(n_cols))`), both floored up to at least `1`. Any other
/// non-positive value is rejected at construction time; a positive value
/// is range-checked against `n_cols` at fit time, once it is known.
#[derive(Debug, Clone, Copy)]
pub struct ForestHyperParams {
    pub max_depth: Option<usize>,
    pub min_sample_split: Option<usize>,
    pub n_estimators: Option<usize>,
    pub mtry: i64,
    pub max_samples: Option<f32>,
    pub n_jobs: Option<i64>,
    pub seed: Option<u64>,
}

impl Default for ForestHyperParams {
    fn default() -> Self {
        ForestHyperParams {
            max_depth: None,
            min_sample_split: None,
            n_estimators: None,
            mtry: -99,
            max_samples: None,
            n_jobs: None,
            seed: None,
        }
    }
}

const DEFAULT_N_ESTIMATORS: usize = 70;
const MTRY_SENTINEL_SQRT: i64 = -99;
const MTRY_SENTINEL_LOG: i64 = -98;

/// A bagged ensemble of [`DecisionTree`]s.
pub struct RandomForest {
    trees: Vec<ForestTree>,
    max_depth: Option<usize>,
    min_sample_split: Option<usize>,
    n_estimators: usize,
    mtry: i64,
    max_samples: Option<f32>,
    n_jobs: usize,
    seed: u64,
    num_features: usize,
    fitted: bool,
}

impl RandomForest {
    /// Constructs an unfitted forest.
    ///
    /// `n_estimators` defaults to `70` if unset. The master seed is
    /// user-supplied or drawn from a non-deterministic entropy source.
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] for any hyperparameter
    /// out of its documented range (see field docs on
    /// [`ForestHyperParams`]).
    pub fn new(params: ForestHyperParams) -> Result<Self> {
        if let Some(d) = params.max_depth {
            if d < 1 {
                return Err(ArboriaError::invalid_argument(
                    "RandomForest::new",
                    "max_depth must be >= 1 when set",
                ));
            }
        }
        if let Some(m) = params.min_sample_split {
            if m < 2 {
                return Err(ArboriaError::invalid_argument(
                    "RandomForest::new",
                    "min_sample_split must be >= 2 when set",
                ));
            }
        }
        let n_estimators = match params.n_estimators {
            Some(0) => {
                return Err(ArboriaError::invalid_argument(
                    "RandomForest::new",
                    "n_estimators must be >= 1 when set",
                ))
            }
            Some(n) => n,
            None => DEFAULT_N_ESTIMATORS,
        };
        if params.mtry != MTRY_SENTINEL_SQRT && params.mtry != MTRY_SENTINEL_LOG && params.mtry < 1
        {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::new",
                "mtry must be a positive integer, or one of the auto sentinels",
            ));
        }
        if let Some(frac) = params.max_samples {
            if !(frac > 0.0 && frac <= 1.0) {
                return Err(ArboriaError::invalid_argument(
                    "RandomForest::new",
                    "max_samples must be in (0, 1] when set",
                ));
            }
        }
        let n_jobs = match params.n_jobs {
            None => 1,
            Some(-1) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or_else(|e| {
                    log::warn!(
                        "random forest: could not query hardware thread count ({e}), falling back to 1 worker"
                    );
                    1
                })
                .min(n_estimators),
            Some(v) if v >= 1 => v as usize,
            Some(_) => {
                return Err(ArboriaError::invalid_argument(
                    "RandomForest::new",
                    "n_jobs must be >= 1, or -1",
                ))
            }
        };
        let seed = params.seed.unwrap_or_else(|| rand::thread_rng().gen());

        Ok(RandomForest {
            trees: Vec::new(),
            max_depth: params.max_depth,
            min_sample_split: params.min_sample_split,
            n_estimators,
            mtry: params.mtry,
            max_samples: params.max_samples,
            n_jobs,
            seed,
            num_features: 0,
            fitted: false,
        })
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn get_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn get_max_features(&self) -> i64 {
        self.mtry
    }

    pub fn get_max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn get_max_samples(&self) -> Option<f32> {
        self.max_samples
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn resolve_mtry(&self, n_cols: usize) -> Result<usize> {
        let resolved = match self.mtry {
            MTRY_SENTINEL_SQRT => ((n_cols as f64).sqrt().floor() as usize).max(1),
            MTRY_SENTINEL_LOG => ((n_cols as f64).log2().floor() as usize).max(1),
            m => m as usize,
        };
        if resolved < 1 || resolved > n_cols {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::fit",
                "mtry does not resolve to a value in [1, n_cols]",
            ));
        }
        Ok(resolved)
    }

    /// Fits the forest on `data` under `policy`.
    ///
    /// `policy.feature_selection` must be the `RandomK` variant (its inner
    /// `mtry` value is ignored — the forest's own, possibly sentinel,
    /// `mtry` is resolved against `data.n_cols()` and substituted for
    /// every tree).
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] if `data` is empty, if
    /// `policy.feature_selection` is not `RandomK`, or if `mtry` does not
    /// resolve to a value in `[1, n_cols]`. Propagates any error raised
    /// while growing an individual tree.
    pub fn fit(&mut self, data: &Dataset, policy: &SplitPolicy) -> Result<()> {
        log::debug!(
            "random forest: fit start ({} estimators, {} workers)",
            self.n_estimators,
            self.n_jobs
        );
        if data.is_empty() {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::fit",
                "dataset is empty",
            ));
        }
        if !matches!(policy.feature_selection, FeatureSelection::RandomK(_)) {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::fit",
                "policy must select RandomK feature selection for a forest",
            ));
        }
        let n_cols = data.n_cols();
        let resolved_mtry = self.resolve_mtry(n_cols)?;
        let effective_policy = SplitPolicy {
            task: policy.task,
            criterion: policy.criterion,
            threshold_rule: policy.threshold_rule,
            feature_selection: FeatureSelection::RandomK(resolved_mtry),
        };

        let n_rows = data.n_rows();
        let bootstrap_size = match self.max_samples {
            Some(frac) => ((frac as f64) * n_rows as f64).floor() as usize,
            None => n_rows,
        }
        .max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.n_jobs)
            .build()
            .map_err(|e| {
                ArboriaError::logic_error("RandomForest::fit", &format!("failed to build worker pool: {e}"))
            })?;

        let master_seed = self.seed;
        let max_depth = self.max_depth;
        let min_sample_split = self.min_sample_split;
        let task = policy.task;

        let results: Result<Vec<ForestTree>> = pool.install(|| {
            (0..self.n_estimators)
                .into_par_iter()
                .map(|i| -> Result<ForestTree> {
                    log::debug!("random forest: fitting tree {i}");
                    let tree_seed = derive_seed(master_seed, i as u64);
                    let mut ctx = SplitContext::new(tree_seed);

                    let draws = bootstrap(n_rows, bootstrap_size, &mut ctx.rng)?;
                    let mut in_bag = vec![false; n_rows];
                    for &row in &draws {
                        in_bag[row] = true;
                    }

                    let mut tree = DecisionTree::new(
                        TreeHyperParams {
                            max_depth,
                            min_sample_split,
                        },
                        task,
                    )?;
                    tree.fit_with(data, &draws, &effective_policy, Some(&mut ctx))?;

                    Ok(ForestTree { tree, in_bag })
                })
                .collect()
        });

        self.trees = results?;
        self.num_features = n_cols;
        self.fitted = true;
        log::debug!("random forest: fit end ({} estimators)", self.n_estimators);
        Ok(())
    }

    fn check_predict_input(&self, samples: &[f32]) -> Result<usize> {
        if !self.fitted || self.num_features == 0 {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::predict",
                "forest has not been fitted",
            ));
        }
        if samples.len() % self.num_features != 0 {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::predict",
                "samples do not have the correct dimension",
            ));
        }
        Ok(samples.len() / self.num_features)
    }

    /// Class-1 vote share for each sample: the mean, over all trees, of
    /// `tree.predict_one(sample)`.
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] if the forest is not
    /// fitted, or if `samples.len()` is not a multiple of the number of
    /// features seen at fit.
    pub fn predict_proba(&self, samples: &[f32]) -> Result<Vec<f32>> {
        let num_samples = self.check_predict_input(samples)?;
        let n_features = self.num_features;
        let n_trees = self.trees.len() as f32;

        let result: Result<Vec<f32>> = samples
            .par_chunks(n_features)
            .map(|row| -> Result<f32> {
                let mut votes = 0u32;
                for forest_tree in &self.trees {
                    if forest_tree.tree.predict_one(row)? == 1 {
                        votes += 1;
                    }
                }
                Ok(votes as f32 / n_trees)
            })
            .collect();
        let result = result?;
        debug_assert_eq!(result.len(), num_samples);
        Ok(result)
    }

    /// Hard predictions: [`RandomForest::predict_proba`] thresholded at
    /// `0.5` (`>= 0.5` classifies as `1`).
    pub fn predict(&self, samples: &[f32]) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(samples)?
            .into_iter()
            .map(|p| if p >= 0.5 { 1 } else { 0 })
            .collect())
    }

    /// Out-of-bag accuracy: for each row, averages the votes of only the
    /// trees that did not see it during training, classifies at `0.5`,
    /// and returns the fraction of rows classified correctly.
    ///
    /// Rows seen by every tree (no out-of-bag trees at all) are skipped.
    ///
    /// # Errors
    /// Returns [`ArboriaError::InvalidArgument`] if the forest is not
    /// fitted or `data` has a different `n_cols` than training saw.
    /// Returns [`ArboriaError::LogicError`] if every row was skipped.
    pub fn out_of_bag(&self, data: &Dataset) -> Result<f32> {
        if !self.fitted {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::out_of_bag",
                "forest has not been fitted",
            ));
        }
        if data.n_cols() != self.num_features {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::out_of_bag",
                "dataset has a different number of columns than seen in training",
            ));
        }
        if data.is_empty() {
            return Err(ArboriaError::invalid_argument(
                "RandomForest::out_of_bag",
                "dataset is empty",
            ));
        }

        let mut correct = 0u32;
        let mut wrong = 0u32;
        for r in 0..data.n_rows() {
            let sample = data.row(r)?;
            let out_of_bag_trees: Vec<&ForestTree> = self
                .trees
                .iter()
                .filter(|t| !t.in_bag.get(r).copied().unwrap_or(false))
                .collect();
            if out_of_bag_trees.is_empty() {
                continue;
            }
            let mut votes = 0u32;
            for forest_tree in &out_of_bag_trees {
                if forest_tree.tree.predict_one(sample)? == 1 {
                    votes += 1;
                }
            }
            let vote_share = votes as f32 / out_of_bag_trees.len() as f32;
            let predicted = if vote_share >= 0.5 { 1.0 } else { 0.0 };
            if predicted == data.iloc_y(r)? {
                correct += 1;
            } else {
                wrong += 1;
            }
        }

        if correct + wrong == 0 {
            return Err(ArboriaError::logic_error(
                "RandomForest::out_of_bag",
                "every row was skipped: no row was ever out-of-bag",
            ));
        }
        Ok(correct as f32 / (correct + wrong) as f32)
    }
}
