use mlcompare_classifiers::config::{ClassifierKind, HyperparameterSpec};

fn describe_spec(spec: &HyperparameterSpec) -> String {
    let kind = if spec.integer { "integer" } else { "real" };
    format!(
        "  {:<13} {:<8} range [{}, {}], default {}",
        spec.name, kind, spec.min, spec.max, spec.default
    )
}

/// Human-readable listing of the hyperparameters of `kinds`.
pub fn describe(kinds: &[ClassifierKind]) -> Vec<String> {
    let mut lines = Vec::new();
    for kind in kinds {
        lines.push(format!("{}:", kind));
        lines.extend(kind.hyperparameter_specs().iter().map(describe_spec));
        if *kind == ClassifierKind::RandomForest {
            lines.push(format!("  {:<13} {:<8} optional, default 1234", "random_state", "integer"));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_knn() {
        assert_eq!(
            describe(&[ClassifierKind::Knn]),
            vec![
                "KNN:".to_string(),
                "  K             integer  range [1, 15], default 1".to_string()
            ]
        );
    }

    #[test]
    fn test_describe_all() {
        let lines = describe(&ClassifierKind::ALL);
        assert!(lines.contains(&"SVM:".to_string()));
        assert!(lines.iter().any(|l| l.contains("n_estimators") && l.contains("[1, 100]")));
        assert!(lines.iter().any(|l| l.contains("random_state")));
    }
}
