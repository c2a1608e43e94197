use crate::config::{ClassifierKind, Hyperparameters, ModelConfig};
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::Classifier;
use crate::models::knn::KnnClassifier;
use crate::models::random_forest::{RandomForestClassifier, DEFAULT_RANDOM_STATE};
use crate::models::svm::SvmClassifier;

/// Build an untrained classifier of `kind` from its hyperparameters.
///
/// Only the names relevant to `kind` are read: `K` for KNN, `C` for SVM and
/// `max_depth`, `n_estimators` (plus optional `random_state`) for the random
/// forest. Anything else in `params` is ignored.
pub fn create(kind: ClassifierKind, params: &Hyperparameters) -> Result<Box<dyn Classifier>> {
    let model: Box<dyn Classifier> = match kind {
        ClassifierKind::Knn => {
            let k = params.require_int("K", 1)?;
            Box::new(KnnClassifier::new(k))
        }
        ClassifierKind::Svm => {
            let c = params.require("C")?;
            if c <= 0.0 {
                return Err(ClassifierError::hyperparameter(
                    "C",
                    format!("must be > 0, got {}", c),
                ));
            }
            Box::new(SvmClassifier::new(c))
        }
        ClassifierKind::RandomForest => {
            let max_depth = params.require_int("max_depth", 1)?;
            let n_estimators = params.require_int("n_estimators", 1)?;
            let random_state = params
                .optional_int("random_state", 0)?
                .map_or(DEFAULT_RANDOM_STATE, |s| s as u64);
            Box::new(
                RandomForestClassifier::new(n_estimators, max_depth).with_random_state(random_state),
            )
        }
    };

    log::debug!("Created {} classifier with {}", kind, params);
    Ok(model)
}

/// Build a classifier from a `ModelConfig`.
pub fn build_model(config: &ModelConfig) -> Result<Box<dyn Classifier>> {
    create(config.kind, &config.hyperparameters)
}
