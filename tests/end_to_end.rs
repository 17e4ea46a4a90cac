//! End-to-end scenarios exercised only through the public API: fitting a
//! tree or forest and checking its predictions, mirroring the concrete
//! scenarios the original C++ test suite checks file-by-file
//! (`test_decisiontree.cpp`, `test_random_forest.cpp`, ...).

use arboria::{
    param_builder, Criterion, Dataset, DecisionTree, FeatureSelection, ForestHyperParams,
    ModelFamily, ParamOverrides, RandomForest, Task, ThresholdRule, TreeHyperParams,
};

fn gini_policy(model: ModelFamily) -> arboria::SplitPolicy {
    param_builder(model, Task::Classification, ParamOverrides::default()).unwrap()
}

/// Installs the `log` facade's `env_logger` backend so a forest's fit/predict
/// traces are visible under `RUST_LOG=debug`. Harmless if another test in
/// this binary already installed it.
fn init_logging() {
    let _ = env_logger::try_init();
}

#[test]
fn decision_tree_trivial_classes() {
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
    tree.fit(&data, &gini_policy(ModelFamily::DecisionTree)).unwrap();

    assert!(tree.is_fitted());
    assert_eq!(tree.predict_one(&[8.0, 9.0, 10.0]).unwrap(), 1);
    assert_eq!(tree.predict_one(&[1.0, 0.0, 0.0]).unwrap(), 0);
}

#[test]
fn decision_tree_entropy_criterion_selectable_via_overrides() {
    let data = Dataset::new(
        vec![
            1.0, 2.0, 11.0, 1.0, 2.0, 11.1, 1.0, 2.0, 10.9, 1.0, 2.0, 6.0,
        ],
        vec![1.0, 0.0, 1.0, 0.0],
        4,
        3,
    )
    .unwrap();
    let policy = param_builder(
        ModelFamily::DecisionTree,
        Task::Classification,
        ParamOverrides {
            criterion: Some(Criterion::Entropy),
            threshold_rule: Some(ThresholdRule::Cart),
            feature_selection: None,
        },
    )
    .unwrap();

    let mut tree = DecisionTree::new(TreeHyperParams::default(), Task::Classification).unwrap();
    tree.fit(&data, &policy).unwrap();
    // feature 2 separates the data almost perfectly; both extremes should
    // route to the class their neighbourhood votes for.
    assert_eq!(tree.predict_one(&[1.0, 2.0, 5.0]).unwrap(), 0);
}

#[test]
fn random_forest_separable_clusters() {
    init_logging();
    let x = vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 10.0, 10.0, 10.0, 11.0, 10.0, 10.0, 10.0,
        11.0, 9.0,
    ];
    let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let data = Dataset::new(x, y, 6, 3).unwrap();

    let policy = arboria::SplitPolicy {
        task: Task::Classification,
        criterion: Criterion::Gini,
        threshold_rule: ThresholdRule::Cart,
        feature_selection: FeatureSelection::RandomK(2),
    };

    let mut forest = RandomForest::new(ForestHyperParams {
        n_estimators: Some(25),
        mtry: 2,
        max_depth: Some(4),
        seed: Some(123),
        ..Default::default()
    })
    .unwrap();
    forest.fit(&data, &policy).unwrap();

    let samples = vec![0.0, 0.0, 0.0, 10.0, 10.0, 10.0];
    assert_eq!(forest.predict(&samples).unwrap(), vec![0, 1]);

    for p in forest.predict_proba(&samples).unwrap() {
        assert!((0.0..=1.0).contains(&p));
    }

    let mut other_seed = RandomForest::new(ForestHyperParams {
        n_estimators: Some(25),
        mtry: 2,
        max_depth: Some(4),
        seed: Some(999),
        ..Default::default()
    })
    .unwrap();
    other_seed.fit(&data, &policy).unwrap();

    let probe = vec![5.0, 5.0, 5.0];
    assert_ne!(
        forest.predict_proba(&probe).unwrap(),
        other_seed.predict_proba(&probe).unwrap()
    );
}

#[test]
fn random_forest_out_of_bag_range_and_empty_dataset_errors() {
    let x = vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 10.0, 10.0, 10.0, 11.0, 10.0, 10.0, 10.0,
        11.0, 9.0,
    ];
    let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let data = Dataset::new(x, y, 6, 3).unwrap();

    let policy = arboria::SplitPolicy {
        task: Task::Classification,
        criterion: Criterion::Gini,
        threshold_rule: ThresholdRule::Cart,
        feature_selection: FeatureSelection::RandomK(2),
    };

    let mut forest = RandomForest::new(ForestHyperParams {
        n_estimators: Some(20),
        mtry: 2,
        seed: Some(42),
        ..Default::default()
    })
    .unwrap();
    forest.fit(&data, &policy).unwrap();

    let oob = forest.out_of_bag(&data).unwrap();
    assert!((0.0..=1.0).contains(&oob));

    let empty = Dataset::new(vec![], vec![], 0, 3).unwrap();
    assert!(forest.out_of_bag(&empty).is_err());
}

#[test]
fn reproducibility_is_independent_of_worker_count() {
    let x = vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 10.0, 10.0, 10.0, 11.0, 10.0, 10.0, 10.0,
        11.0, 9.0,
    ];
    let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let data = Dataset::new(x, y, 6, 3).unwrap();
    let policy = arboria::SplitPolicy {
        task: Task::Classification,
        criterion: Criterion::Gini,
        threshold_rule: ThresholdRule::Cart,
        feature_selection: FeatureSelection::RandomK(2),
    };

    let mut serial = RandomForest::new(ForestHyperParams {
        n_estimators: Some(15),
        mtry: 2,
        seed: Some(55),
        n_jobs: Some(1),
        ..Default::default()
    })
    .unwrap();
    serial.fit(&data, &policy).unwrap();

    let mut parallel = RandomForest::new(ForestHyperParams {
        n_estimators: Some(15),
        mtry: 2,
        seed: Some(55),
        n_jobs: Some(2),
        ..Default::default()
    })
    .unwrap();
    parallel.fit(&data, &policy).unwrap();

    let probe = vec![3.0, 4.0, 5.0, 9.0, 9.0, 9.0];
    assert_eq!(
        serial.predict_proba(&probe).unwrap(),
        parallel.predict_proba(&probe).unwrap()
    );
}
