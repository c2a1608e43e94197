use anyhow::{Context, Result};

use mlcompare_classifiers::config::{ClassifierKind, ModelConfig};
use mlcompare_classifiers::datasets::{self, DatasetId};
use mlcompare_classifiers::evaluation::{evaluate, EvaluationResult};
use mlcompare_classifiers::models::factory;

/// Score every classifier kind, each with its default hyperparameters, on
/// the same split of one dataset.
pub fn compare(
    dataset_id: DatasetId,
    test_fraction: f64,
    seed: u64,
) -> Result<Vec<(ModelConfig, EvaluationResult)>> {
    let dataset = datasets::load(dataset_id)?;

    ClassifierKind::ALL
        .iter()
        .map(|&kind| -> Result<(ModelConfig, EvaluationResult)> {
            let model = ModelConfig::with_defaults(kind);
            let mut classifier = factory::build_model(&model)?;
            let result = evaluate(&dataset, classifier.as_mut(), test_fraction, seed)
                .with_context(|| format!("Evaluation of {} on {} failed", kind, dataset_id))?;
            log::info!(
                "[mlcompare::compare] {} {}: accuracy {:.4}",
                kind,
                model.hyperparameters,
                result.accuracy
            );
            Ok((model, result))
        })
        .collect()
}

/// One line per classifier, e.g. `KNN {K=1}: ACCURACY 0.9667 (29/30)`.
pub fn format_comparison(results: &[(ModelConfig, EvaluationResult)]) -> Vec<String> {
    results
        .iter()
        .map(|(model, r)| {
            format!(
                "{} {}: ACCURACY {:.4} ({}/{})",
                model.kind, model.hyperparameters, r.accuracy, r.n_correct, r.n_test
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_covers_every_classifier() {
        let results = compare(DatasetId::Iris, 0.2, 1234).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(_, r)| r.n_test == 30));

        let lines = format_comparison(&results);
        assert!(lines[0].starts_with("KNN {K=1}: ACCURACY "));
        assert!(lines[1].starts_with("SVM {C=0.01}: ACCURACY "));
        assert!(lines[2].starts_with("RANDOM FOREST {max_depth=2, n_estimators=1}: ACCURACY "));
    }
}
