use mlcompare_classifiers::config::{ClassifierKind, Hyperparameters, ModelConfig};
use mlcompare_classifiers::models::factory;
use mlcompare_classifiers::ClassifierError;
use ndarray::{Array1, Array2};

#[test]
fn test_factory_builds_and_predicts() {
    // tiny dataset
    let x = Array2::from_shape_vec(
        (6, 2),
        vec![
            1.0, 0.0, // class 1
            0.0, 1.0, // class 0
            1.0, 0.1, // class 1
            0.0, 0.9, // class 0
            1.1, 0.0, // class 1
            0.0, 1.2, // class 0
        ],
    )
    .expect("failed to create feature matrix");
    let y = Array1::from_vec(vec![1usize, 0, 1, 0, 1, 0]);

    let configs = [
        ModelConfig::new(ClassifierKind::Knn, Hyperparameters::new().with("K", 3.0)),
        ModelConfig::new(ClassifierKind::Svm, Hyperparameters::new().with("C", 1.0)),
        ModelConfig::new(
            ClassifierKind::RandomForest,
            Hyperparameters::new()
                .with("max_depth", 3.0)
                .with("n_estimators", 10.0),
        ),
    ];

    for config in configs {
        let mut model = factory::build_model(&config).expect("valid config");
        model.fit(x.view(), y.view()).expect("fit");
        let pred = model.predict(x.view()).expect("predict");
        assert_eq!(pred.len(), x.nrows());
        assert!(pred.iter().all(|&p| p <= 1), "{} predicted an unseen label", model.name());
    }
}

#[test]
fn test_factory_validation() {
    let bad = [
        (ClassifierKind::Knn, Hyperparameters::new().with("K", 0.0)),
        (ClassifierKind::Knn, Hyperparameters::new()),
        (ClassifierKind::Svm, Hyperparameters::new().with("C", -1.0)),
        (
            ClassifierKind::RandomForest,
            Hyperparameters::new().with("max_depth", 0.0).with("n_estimators", 5.0),
        ),
        (
            ClassifierKind::RandomForest,
            Hyperparameters::new().with("max_depth", 3.0).with("n_estimators", 1.5),
        ),
    ];
    for (kind, params) in bad {
        assert!(
            matches!(
                factory::create(kind, &params),
                Err(ClassifierError::InvalidHyperparameter { .. })
            ),
            "{} accepted {}",
            kind,
            params
        );
    }

    assert!(factory::create(ClassifierKind::Knn, &Hyperparameters::new().with("K", 5.0)).is_ok());
    assert!(factory::create(ClassifierKind::Svm, &Hyperparameters::new().with("C", 1.0)).is_ok());
}

#[test]
fn test_unknown_classifier_name() {
    assert!(matches!(
        "gradient boosting".parse::<ClassifierKind>(),
        Err(ClassifierError::UnknownClassifier(_))
    ));
}

#[test]
fn test_config_json_shape() {
    let config: ModelConfig =
        serde_json::from_str(r#"{"kind": "random_forest", "hyperparameters": {"max_depth": 4, "n_estimators": 20}}"#)
            .unwrap();
    assert_eq!(config.kind, ClassifierKind::RandomForest);
    assert_eq!(config.hyperparameters.get("n_estimators"), Some(20.0));

    let defaults: ModelConfig = serde_json::from_str(r#"{"kind": "svm"}"#).unwrap();
    assert!(defaults.hyperparameters.is_empty());
}
