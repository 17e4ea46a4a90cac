//! Training and querying axis-aligned binary decision trees and bagged
//! ensembles of such trees (random forests) over dense tabular data with
//! real-valued features and binary class labels.
//!
//! A caller supplies a row-major feature matrix and a label vector
//! ([`Dataset`]), picks a [`SplitPolicy`] (via [`param_builder`] or by
//! hand), and fits either a single [`DecisionTree`] or a bagged
//! [`RandomForest`]. Both expose `predict`/`predict_one`; the forest
//! additionally exposes `predict_proba` and `out_of_bag`.

pub mod builder;
pub mod dataset;
pub mod error;
pub mod features;
pub mod forest;
pub mod helpers;
pub mod impurity;
pub mod policy;
pub mod sampler;
pub mod splitter;
pub mod threshold;
pub mod tree;

pub use builder::{param_builder, ModelFamily, ParamOverrides};
pub use dataset::Dataset;
pub use error::{ArboriaError, Result};
pub use forest::{ForestHyperParams, RandomForest};
pub use policy::{Criterion, FeatureSelection, SplitContext, SplitPolicy, SplitResult, SplitStats, Task, ThresholdRule};
pub use tree::{DecisionTree, Node, TreeHyperParams};
