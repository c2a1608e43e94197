//! Train/test evaluation of a classifier on a dataset.
use ndarray::ArrayView1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

use crate::datasets::Dataset;
use crate::error::{ClassifierError, Result};
use crate::models::Classifier;

/// Share of rows held out for testing when nothing else is configured.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Outcome of one fit/predict run on a held-out test set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub n_correct: usize,
}

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_samples` with a seeded generator and cut off the first
/// `ceil(test_fraction * n_samples)` indices as the test set.
pub fn train_test_split(n_samples: usize, test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ClassifierError::InvalidParameter(format!(
            "test fraction must lie in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = (test_fraction * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(ClassifierError::InvalidParameter(format!(
            "cannot split {} rows with test fraction {}: {} train / {} test",
            n_samples, test_fraction, n_train, n_test
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(Split {
        train,
        test: indices,
    })
}

/// Fraction of positions where `y_pred` equals `y_true`.
pub fn accuracy_score(y_true: ArrayView1<'_, usize>, y_pred: ArrayView1<'_, usize>) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(ClassifierError::InvalidParameter(format!(
            "{} true labels but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(ClassifierError::InvalidParameter(
            "cannot score an empty prediction".to_string(),
        ));
    }
    let correct = count_correct(y_true, y_pred);
    Ok(correct as f64 / y_true.len() as f64)
}

fn count_correct(y_true: ArrayView1<'_, usize>, y_pred: ArrayView1<'_, usize>) -> usize {
    y_true.iter().zip(y_pred.iter()).filter(|(t, p)| t == p).count()
}

/// Split `dataset`, fit `classifier` on the train rows and score it on the
/// test rows.
pub fn evaluate(
    dataset: &Dataset,
    classifier: &mut dyn Classifier,
    test_fraction: f64,
    seed: u64,
) -> Result<EvaluationResult> {
    let split = train_test_split(dataset.nrows(), test_fraction, seed)?;
    log::debug!(
        "Split {} rows into {} train / {} test (seed {})",
        dataset.nrows(),
        split.train.len(),
        split.test.len(),
        seed
    );

    let train = dataset.select_rows(&split.train);
    let test = dataset.select_rows(&split.test);

    classifier.fit(train.records.view(), train.targets.view())?;
    let predictions = classifier.predict(test.records.view())?;

    let n_correct = count_correct(test.targets.view(), predictions.view());
    let accuracy = accuracy_score(test.targets.view(), predictions.view())?;

    log::debug!(
        "{}: {}/{} test rows correct (accuracy {:.4})",
        classifier.name(),
        n_correct,
        split.test.len(),
        accuracy
    );

    Ok(EvaluationResult {
        accuracy,
        n_train: split.train.len(),
        n_test: split.test.len(),
        n_correct,
    })
}
